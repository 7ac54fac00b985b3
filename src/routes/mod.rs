mod contact;
mod cors;
mod health;
mod newsletters;
mod pages;
mod payments;
mod subscriptions;
mod subscriptions_confirm;
mod unsubscribe;
mod visits;

pub use contact::*;
pub use cors::*;
pub use health::*;
pub use newsletters::*;
pub use pages::*;
pub use payments::*;
pub use subscriptions::*;
pub use subscriptions_confirm::*;
pub use unsubscribe::*;
pub use visits::*;
