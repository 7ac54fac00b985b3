mod contact_submission;
mod email_address;
mod locale;
mod locale_resolver;
mod new_subscriber;
mod sanitize;
mod subscriber_status;
mod token;

pub use contact_submission::{ContactSubmission, ContactSubmissionBody};
pub use email_address::EmailAddress;
pub use locale::{CurrentLocale, Locale};
pub use locale_resolver::{resolve_locale, LocaleResolution};
pub use new_subscriber::NewSubscriber;
pub use sanitize::{pseudonymize, sanitize_input, validate_email, MAX_EMAIL_LENGTH, MAX_INPUT_LENGTH};
pub use subscriber_status::SubscriberStatus;
pub use token::generate_token;
