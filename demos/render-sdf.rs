// glyph-sdf/demos/render-sdf.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use clap::{Arg, ArgAction, ArgMatches, Command};
use colored::Colorize;
use glyph_sdf::loaders::mem::MemLoader;
use glyph_sdf::options::{FillRule, SdfOptions};
use glyph_sdf::outline::{Contour, Outline, OutlineBuilder, OutlineSink};
use glyph_sdf::sdf::{SdfGenerator, SdfGlyph};
use glyph_sdf::GlyphLoader;
use pathfinder_geometry::vector::Vector2I;
use std::process;

const BUILTIN_GLYPH_ID: u32 = 1;

fn get_args() -> ArgMatches {
    let shape_arg = Arg::new("SHAPE")
        .help("Built-in outline to render")
        .value_parser(["square", "ring", "circle", "star"])
        .default_value("ring")
        .index(1);
    let size_arg = Arg::new("SIZE")
        .help("Glyph size in pixels")
        .default_value("24")
        .index(2);
    let spread_arg = Arg::new("spread")
        .help("Distance field spread in pixels")
        .short('s')
        .long("spread")
        .default_value("4");
    let even_odd_arg = Arg::new("even-odd")
        .help("Use the even-odd fill rule instead of non-zero")
        .short('e')
        .long("even-odd")
        .action(ArgAction::SetTrue);
    let font_arg = Arg::new("font")
        .help("Render a character from this font file instead (needs `loader-freetype`)")
        .short('f')
        .long("font")
        .value_names(["PATH"]);
    let char_arg = Arg::new("char")
        .help("Character to render from the font")
        .short('c')
        .long("char")
        .default_value("A");
    Command::new("render-sdf")
        .version("0.1")
        .author("The Pathfinder Project Developers")
        .about("Simple example tool to render signed distance fields with `glyph-sdf`")
        .arg(shape_arg)
        .arg(size_arg)
        .arg(spread_arg)
        .arg(even_odd_arg)
        .arg(font_arg)
        .arg(char_arg)
        .get_matches()
}

fn main() {
    env_logger::init();
    let matches = get_args();

    let size: i32 = parse_arg(&matches, "SIZE");
    let spread: u32 = parse_arg(&matches, "spread");
    let fill_rule = if matches.get_flag("even-odd") {
        FillRule::EvenOdd
    } else {
        FillRule::NonZero
    };
    let generator = SdfGenerator::new(SdfOptions::new().spread(spread).fill_rule(fill_rule));

    let glyph = match matches.get_one::<String>("font") {
        Some(path) => {
            let character = matches
                .get_one::<String>("char")
                .and_then(|s| s.chars().next())
                .unwrap_or('A');
            render_from_font(&generator, path, character, size as f32)
        }
        None => {
            let shape = matches.get_one::<String>("SHAPE").unwrap();
            let mut loader = MemLoader::new();
            loader.insert_outline(BUILTIN_GLYPH_ID, builtin_outline(shape, size * 64), 0);
            render(&generator, &mut loader, BUILTIN_GLYPH_ID)
        }
    };

    print_glyph(&glyph);
}

fn parse_arg<T>(matches: &ArgMatches, name: &str) -> T
where
    T: std::str::FromStr,
{
    let value = matches.get_one::<String>(name).unwrap();
    match value.parse() {
        Ok(value) => value,
        Err(_) => {
            eprintln!("invalid value for {}: {}", name, value);
            process::exit(1);
        }
    }
}

fn render<L>(generator: &SdfGenerator, loader: &mut L, glyph_id: u32) -> SdfGlyph
where
    L: GlyphLoader,
{
    match generator.render_glyph(loader, glyph_id) {
        Ok(glyph) => glyph,
        Err(error) => {
            eprintln!("failed to render glyph {}: {} (code {})", glyph_id, error, error.code());
            process::exit(1);
        }
    }
}

#[cfg(feature = "loader-freetype")]
fn render_from_font(generator: &SdfGenerator, path: &str, character: char, size: f32) -> SdfGlyph {
    use glyph_sdf::loaders::freetype::FreeTypeLoader;

    let mut loader = match FreeTypeLoader::from_path(path, 0, size) {
        Ok(loader) => loader,
        Err(error) => {
            eprintln!("failed to load {}: {}", path, error);
            process::exit(1);
        }
    };
    let glyph_id = match loader.glyph_for_char(character) {
        Some(glyph_id) => glyph_id,
        None => {
            eprintln!("{} has no glyph for {:?}", path, character);
            process::exit(1);
        }
    };
    render(generator, &mut loader, glyph_id)
}

#[cfg(not(feature = "loader-freetype"))]
fn render_from_font(_: &SdfGenerator, _: &str, _: char, _: f32) -> SdfGlyph {
    eprintln!("rendering from a font file needs the `loader-freetype` feature");
    process::exit(1);
}

/// Builds one of the demo shapes, `size` 26.6 units across.
fn builtin_outline(shape: &str, size: i32) -> Outline {
    let half = size / 2;
    match shape {
        "square" => polygon(&[(0, 0), (size, 0), (size, size), (0, size)]),
        "star" => {
            let points: Vec<(i32, i32)> = (0..10)
                .map(|index| {
                    let angle = std::f32::consts::PI * (0.5 + index as f32 / 5.0);
                    let radius = (if index % 2 == 0 { half } else { half * 2 / 5 }) as f32;
                    (
                        half + (radius * angle.cos()) as i32,
                        half + (radius * angle.sin()) as i32,
                    )
                })
                .collect();
            polygon(&points)
        }
        "circle" => circle(half, half, half),
        _ => {
            // The inner circle is wound the other way, so it is a hole under either fill rule.
            let mut builder = OutlineBuilder::new();
            append_circle(&mut builder, half, half, half, false);
            append_circle(&mut builder, half, half, half / 2, true);
            builder.into_outline()
        }
    }
}

fn polygon(points: &[(i32, i32)]) -> Outline {
    let points: Vec<Vector2I> = points.iter().map(|&(x, y)| Vector2I::new(x, y)).collect();
    Outline {
        contours: vec![Contour::from_polygon(&points)],
    }
}

fn circle(center_x: i32, center_y: i32, radius: i32) -> Outline {
    let mut builder = OutlineBuilder::new();
    append_circle(&mut builder, center_x, center_y, radius, false);
    builder.into_outline()
}

fn append_circle<S>(sink: &mut S, cx: i32, cy: i32, r: i32, clockwise: bool)
where
    S: OutlineSink,
{
    // Control point distance for a quarter circle.
    let k = r * 4 / 7;
    let sign = if clockwise { -1 } else { 1 };
    let p = |x: i32, y: i32| Vector2I::new(cx + x, cy + sign * y);
    sink.move_to(p(r, 0));
    sink.cubic_curve_to(p(r, k), p(k, r), p(0, r));
    sink.cubic_curve_to(p(-k, r), p(-r, k), p(-r, 0));
    sink.cubic_curve_to(p(-r, -k), p(-k, -r), p(0, -r));
    sink.cubic_curve_to(p(k, -r), p(r, -k), p(r, 0));
    sink.close();
}

fn print_glyph(glyph: &SdfGlyph) {
    println!(
        "metrics: {:?}\nplacement: left {}, top {}",
        glyph.metrics, glyph.placement.left, glyph.placement.top
    );
    let bitmap = match glyph.bitmap {
        Some(ref bitmap) => bitmap,
        None => {
            println!("(empty glyph)");
            return;
        }
    };
    for y in 0..bitmap.height {
        let mut line = String::new();
        for &value in bitmap.row(y) {
            let shade = shade(value).to_string().repeat(2);
            if value >= 128 {
                line.push_str(&shade.green().to_string());
            } else {
                line.push_str(&shade.blue().to_string());
            }
        }
        println!("{}", line);
    }
}

fn shade(value: u8) -> char {
    match value {
        0 => ' ',
        1..=84 => '░',
        85..=169 => '▒',
        170..=254 => '▓',
        _ => '█',
    }
}
