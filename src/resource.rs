/// Message shown for any remote failure. Transport details are only logged.
pub const GENERIC_LOAD_ERROR: &str = "Unable to load recipe. Please try again later";

/// Message shown for a failing local store.
pub const GENERIC_STORE_ERROR: &str = "Unable to read saved recipes";

/// Outcome of an asynchronous data request.
///
/// Exactly one variant is active. `Success` always carries its payload; a
/// lookup that may legitimately find nothing is typed `Resource<Option<T>>`
/// so that "not found" stays distinct from `Error`.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource<T> {
    Loading,
    Success(T),
    Error(String),
}

impl<T> Resource<T> {
    /// Build an `Error`, substituting the generic message for an empty one.
    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Resource::Error(GENERIC_LOAD_ERROR.to_string())
        } else {
            Resource::Error(message)
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Resource::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Resource::Error(_))
    }

    /// Borrow the payload of a `Success`.
    pub fn data(&self) -> Option<&T> {
        match self {
            Resource::Success(data) => Some(data),
            Resource::Loading | Resource::Error(_) => None,
        }
    }

    /// Borrow the message of an `Error`.
    pub fn message(&self) -> Option<&str> {
        match self {
            Resource::Error(message) => Some(message),
            Resource::Loading | Resource::Success(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resource<U> {
        match self {
            Resource::Loading => Resource::Loading,
            Resource::Success(data) => Resource::Success(f(data)),
            Resource::Error(message) => Resource::Error(message),
        }
    }
}
