mod health_check;
mod pages;
mod payments;
mod subscriptions;
mod subscriptions_confirm;
mod unsubscribe;
mod visits;
