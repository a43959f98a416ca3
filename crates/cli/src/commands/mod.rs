pub mod account;
pub mod content;
pub mod photos;
pub mod settings;
pub mod status;

use anyhow::{bail, Result};
use familyalbum_core::Album;

/// Gallery and content commands need a signed-in session, as the album's
/// pages do.
pub fn ensure_signed_in(album: &Album) -> Result<()> {
    if !album.session().authenticated {
        bail!("not signed in. Use `album login <username> <password>` first.");
    }
    Ok(())
}
