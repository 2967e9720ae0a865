//! Core trait definitions
//!
//! Seams between the vault and the collaborators it consumes. The
//! persistence gateway lives in [`crate::sync`] and the snapshot store in
//! [`crate::storage`].

/// Source of the signed-in user's identity
///
/// The vault only ever reads the current user id; signing in and out is
/// up to the implementation.
pub trait SessionProvider {
    /// Id of the signed-in user, or `None` when signed out
    fn current_user(&self) -> Option<String>;

    fn is_signed_in(&self) -> bool {
        self.current_user().is_some()
    }
}

impl<T: SessionProvider + ?Sized> SessionProvider for &T {
    fn current_user(&self) -> Option<String> {
        (**self).current_user()
    }
}
