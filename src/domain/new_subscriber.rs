use crate::domain::{EmailAddress, Locale};
use crate::routes::SubscribeBody;

pub struct NewSubscriber {
    pub email: EmailAddress,
    pub locale: Locale,
}

impl TryFrom<SubscribeBody> for NewSubscriber {
    type Error = String;

    fn try_from(value: SubscribeBody) -> Result<Self, Self::Error> {
        let email = EmailAddress::parse(value.email)?;
        // An unknown locale is not worth rejecting a signup over.
        let locale = value
            .locale
            .as_deref()
            .and_then(Locale::from_language_tag)
            .unwrap_or_default();

        Ok(Self { email, locale })
    }
}
