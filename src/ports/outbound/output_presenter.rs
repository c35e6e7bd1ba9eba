use crate::shared::Result;

/// OutputPresenter port for presenting final output
///
/// This port abstracts the output destination (stdout, file, etc.)
/// where the formatted manifest content is presented.
pub trait OutputPresenter {
    /// Presents the formatted manifest content to the output destination
    ///
    /// # Arguments
    /// * `content` - The formatted manifest content to present
    ///
    /// # Errors
    /// Returns an error if:
    /// - Writing to the output destination fails
    /// - The destination exists and overwriting was not allowed
    fn present(&self, content: &str) -> Result<()>;
}
