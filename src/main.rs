use hexagon_tiles as hex;
use std::env;

const N_TILES: u32 = 900;
const COLOR_SATURATED: hex::color::Color = hex::color::Color::new_rgb(0.0, 0.0, 1.0);
const COLOR_EMPTY: hex::color::Color = hex::color::Color::new_rgb(0.0, 0.0, 0.0);

fn main() {
    env::set_var("RUST_BACKTRACE", "1");

    // Lay the tiles out in a roughly square grid
    let layout = hex::grid::GridLayout::with_square_columns(N_TILES);
    let map = hex::map::Map::new_layered(layout, layout.n_rows(N_TILES));

    // Create the color maps
    let color_maps = vec![
        hex::color::GradientMap::new(COLOR_SATURATED, COLOR_EMPTY).into(),
        hex::color::PaletteMap::new_linear(&COLOR_EMPTY, &COLOR_SATURATED, false).into(),
    ];
    let settings = hex::settings::Settings::default()
        .with_color_maps(color_maps);

    // Run the application
    pollster::block_on(hex::application::run(map, settings));
}
