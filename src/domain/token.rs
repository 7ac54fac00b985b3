use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

const TOKEN_LENGTH: usize = 25;

/// Random alphanumeric token used in confirmation and unsubscribe links.
pub fn generate_token() -> String {
    let mut rng = thread_rng();
    std::iter::repeat_with(|| rng.sample(Alphanumeric))
        .map(char::from)
        .take(TOKEN_LENGTH)
        .collect()
}
