use anyhow::{bail, Result};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use familyalbum_core::Album;

pub fn register(album: &mut Album, username: &str, password: &str) -> Result<()> {
    album.register(username, password)?;
    println!("Registered {username}. You can now sign in.");
    Ok(())
}

pub fn login(album: &mut Album, username: &str, password: &str) -> Result<()> {
    if !album.login(username, password) {
        bail!("invalid username or password");
    }
    match album.session().username() {
        Some(name) => println!("Signed in as {name}."),
        None => println!("Signed in with the master key."),
    }
    Ok(())
}

pub fn logout(album: &mut Album) {
    album.logout();
    println!("Signed out.");
}

pub fn whoami(album: &Album) {
    let session = album.session();
    match (&session.current_user, session.authenticated) {
        (Some(user), true) => println!("{} ({})", user.username, user.role),
        (None, true) => println!("signed in with the master key"),
        _ => println!("not signed in"),
    }
}

pub fn users(album: &Album) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![Cell::new("Username"), Cell::new("Role")]);
    for user in album.registered_users() {
        table.add_row(vec![Cell::new(&user.username), Cell::new(user.role)]);
    }
    println!("{table}");
}

pub fn forgot_password(
    album: &mut Album,
    username: &str,
    new_password: &str,
    master_key: &str,
) -> Result<()> {
    album.reset_password(username, new_password, master_key)?;
    println!("Password reset successfully");
    Ok(())
}

pub fn admin_reset(
    album: &mut Album,
    username: &str,
    new_password: &str,
    master_key: &str,
) -> Result<()> {
    album.admin_reset_password(username, new_password, master_key)?;
    println!("Password reset successfully");
    Ok(())
}

pub fn admin_create(
    album: &mut Album,
    username: &str,
    password: &str,
    master_key: &str,
) -> Result<()> {
    album.admin_create_user(username, password, master_key)?;
    println!("User created successfully");
    Ok(())
}
