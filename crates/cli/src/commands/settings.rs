use familyalbum_core::domain::{GridDensity, SettingsPatch, Theme};
use familyalbum_core::Album;

pub fn show(album: &Album) {
    let store = album.settings();
    let settings = store.settings();
    println!("theme:         {}", settings.theme);
    println!("grid density:  {}", settings.grid_density);
    println!("expert mode:   {}", if settings.expert_mode { "on" } else { "off" });
    println!("dark mode:     {}", if store.dark_mode() { "on" } else { "off" });
}

pub fn set(
    album: &mut Album,
    theme: Option<Theme>,
    density: Option<GridDensity>,
    expert: Option<bool>,
) {
    let patch = SettingsPatch {
        theme,
        grid_density: density,
        expert_mode: expert,
    };
    if patch == SettingsPatch::default() {
        println!("Nothing to change.");
        return;
    }
    album.settings_mut().update_settings(patch);
    show(album);
}
