use strum::IntoEnumIterator;

/// Lifecycle of a newsletter subscriber, derived from the stored flags.
///
/// ```text
/// PendingConfirmation --confirm--> Confirmed --unsubscribe--> Inactive
/// ```
///
/// A pending subscriber may also unsubscribe. `Inactive` is terminal: the
/// email stays taken, so signing up again is reported as already subscribed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum SubscriberStatus {
    PendingConfirmation,
    Confirmed,
    Inactive,
}

impl SubscriberStatus {
    pub fn from_flags(is_confirmed: bool, is_active: bool) -> Self {
        match (is_confirmed, is_active) {
            (_, false) => Self::Inactive,
            (false, true) => Self::PendingConfirmation,
            (true, true) => Self::Confirmed,
        }
    }

    /// Status after following a confirmation link, if that is allowed.
    pub fn confirm(self) -> Option<Self> {
        match self {
            Self::PendingConfirmation => Some(Self::Confirmed),
            Self::Confirmed | Self::Inactive => None,
        }
    }

    /// Status after following an unsubscribe link, if that is allowed.
    pub fn unsubscribe(self) -> Option<Self> {
        match self {
            Self::PendingConfirmation | Self::Confirmed => Some(Self::Inactive),
            Self::Inactive => None,
        }
    }

    /// Whether newsletters are delivered in this state.
    pub fn receives_newsletters(self) -> bool {
        self == Self::Confirmed
    }

    /// SQL condition on the `subscribers` flag columns matching exactly this state.
    pub fn sql_predicate(self) -> &'static str {
        match self {
            Self::PendingConfirmation => "(is_confirmed = false AND is_active = true)",
            Self::Confirmed => "(is_confirmed = true AND is_active = true)",
            Self::Inactive => "(is_active = false)",
        }
    }

    /// SQL condition matching every state for which `accepts` holds.
    ///
    /// Queries use this as their state guard, e.g.
    /// `SubscriberStatus::sql_guard(|s| s.confirm().is_some())`.
    pub fn sql_guard(accepts: impl Fn(Self) -> bool) -> String {
        let predicates: Vec<&str> = Self::iter()
            .filter(|status| accepts(*status))
            .map(Self::sql_predicate)
            .collect();

        if predicates.is_empty() {
            "false".into()
        } else {
            format!("({})", predicates.join(" OR "))
        }
    }
}
