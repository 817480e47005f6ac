//! Error taxonomy shared by every component.

/// Errors surfaced by registration, accessor compilation and accessor calls.
///
/// Absent results (a property that cannot be read, a filter with no match, a
/// scan that finds nothing) are not errors and never show up here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	/// A required input was missing or invalid.
	#[error("invalid argument `{argument}`: {reason}")]
	InvalidArgument { argument: &'static str, reason: String },

	/// Metadata is malformed for the requested operation.
	#[error("invalid operation on property `{property}`: {reason}")]
	InvalidOperation { property: String, reason: &'static str },

	/// The requested or supplied type does not match the descriptor.
	#[error("type mismatch in {context}: expected `{expected}`, found `{found}`")]
	TypeMismatch {
		context: String,
		expected: &'static str,
		found: &'static str,
	},
}

impl Error {
	pub(crate) fn invalid_argument(argument: &'static str, reason: impl Into<String>) -> Self {
		Self::InvalidArgument {
			argument,
			reason: reason.into(),
		}
	}
}

/// Result alias defaulting to [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
