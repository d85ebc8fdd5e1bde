//! Profile flags recognized on the host's command line.

const NAME_PREFIX: &str = "-name=";
const PROFILES_PREFIX: &str = "-profiles=";

/// Values captured from `-name=` and `-profiles=` tokens.
///
/// `None` means the flag never appeared. `Some("")` means it appeared with an
/// empty value, which is kept as given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileArgs {
    pub name: Option<String>,
    pub profiles: Option<String>,
}

impl ProfileArgs {
    /// Scan arguments in order. Matching is case-sensitive on the exact prefix.
    /// Stops as soon as both flags carry a non-empty value.
    pub fn scan<S: AsRef<str>>(args: &[S]) -> Self {
        let mut found = Self::default();

        for arg in args {
            let arg = arg.as_ref();
            if let Some(value) = arg.strip_prefix(NAME_PREFIX) {
                found.name = Some(value.to_string());
            } else if let Some(value) = arg.strip_prefix(PROFILES_PREFIX) {
                found.profiles = Some(value.to_string());
            }

            if is_set(&found.name) && is_set(&found.profiles) {
                break;
            }
        }

        found
    }

    /// Profile name, or `default` when absent or empty.
    pub fn profile_name<'a>(&'a self, default: &'a str) -> &'a str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => default,
        }
    }
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}
