use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::queue;
use crossterm::style::{self, Print, ResetColor, SetBackgroundColor};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use colorsmith::cli::{Args, Command, GradientArgs, PaletteAction, RecentAction};
use colorsmith::config::Config;
use colorsmith::contrast::{ensure_contrast, ContrastReport};
use colorsmith::extract::{extract_colors, load_and_prepare};
use colorsmith::format::{self, ColorFormat};
use colorsmith::gradient::{Gradient, GradientKind, GradientStop};
use colorsmith::settings::Settings;
use colorsmith::store::{PaletteStore, Storage};
use colorsmith::Color;

const SVG_WIDTH: u32 = 400;
const SVG_HEIGHT: u32 = 300;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = Config::from_env(args.data_dir);
    tracing::debug!(data_dir = %config.data_dir.display(), "resolved configuration");

    match args.command {
        Command::Extract {
            image,
            colors,
            format,
            save_as,
            preview,
        } => {
            if colors == 0 {
                bail!("--colors must be at least 1");
            }
            let settings = Settings::load(&config.data_dir);
            let format = format.unwrap_or(settings.output_format);

            let pixels = load_and_prepare(&image)?;
            let extracted = extract_colors(&pixels, colors);
            let mut out = io::stdout().lock();
            for entry in &extracted {
                let label = format!(
                    "{}  {:5.1}%",
                    format.format(entry.color),
                    entry.weight * 100.0
                );
                print_color(&mut out, entry.color, &label, preview)?;
            }
            out.flush()?;

            if let Some(name) = save_as {
                let mut store = open_store(&config);
                let id = store.create_palette(&name).id().to_string();
                for entry in &extracted {
                    store.add_color(&id, entry.color, "");
                }
                store.save().context("failed to save palettes")?;
                eprintln!("saved {} colors to palette '{name}' ({id})", extracted.len());
            }
        }

        Command::Convert {
            color,
            to,
            all,
            remember,
        } => {
            let (parsed, source) = format::detect(&color)?;
            tracing::debug!(%source, "detected input notation");
            let mut settings = Settings::load(&config.data_dir);
            if all {
                for target in ColorFormat::ALL {
                    println!("{:<5} {}", target.name(), target.format(parsed));
                }
            } else {
                let target = to.unwrap_or(settings.output_format);
                println!("{}", target.format(parsed));
            }
            settings.set_last_color(parsed);
            if remember {
                if let Some(target) = to {
                    settings.output_format = target;
                }
            }
            settings
                .save(&config.data_dir)
                .context("failed to save settings")?;
        }

        Command::Contrast {
            foreground,
            background,
            fix,
        } => {
            let fg = parse_color(&foreground)?;
            let bg = parse_color(&background)?;
            let report = ContrastReport::new(fg, bg);
            println!("ratio      {}", report.format_ratio());
            println!("AA normal  {}", verdict(report.aa_normal));
            println!("AA large   {}", verdict(report.aa_large));
            println!("AAA normal {}", verdict(report.aaa_normal));
            println!("AAA large  {}", verdict(report.aaa_large));
            if let Some(target) = fix {
                let fixed = ensure_contrast(fg, bg, target);
                let fixed_report = ContrastReport::new(fixed, bg);
                println!("suggested  {} ({})", fixed, fixed_report.format_ratio());
            }
        }

        Command::Recent { action } => {
            let mut store = open_store(&config);
            let settings = Settings::load(&config.data_dir);
            match action {
                Some(RecentAction::Add { color }) => {
                    let color = parse_color(&color)?;
                    store.add_to_recent_colors(color);
                    let mut settings = settings;
                    settings.set_last_color(color);
                    settings
                        .save(&config.data_dir)
                        .context("failed to save settings")?;
                }
                None => {
                    let mut out = io::stdout().lock();
                    for color in store.recent_colors() {
                        let label = settings.output_format.format(*color);
                        print_color(&mut out, *color, &label, true)?;
                    }
                    out.flush()?;
                }
            }
        }

        Command::Palette { action } => run_palette(&config, action)?,

        Command::Gradient(gradient_args) => {
            let gradient = build_gradient(&gradient_args)?;
            if gradient_args.svg {
                println!("{}", gradient.to_svg_document(SVG_WIDTH, SVG_HEIGHT));
            } else {
                println!("{}", gradient.to_css());
            }
        }

        Command::Random { format } => {
            let settings = Settings::load(&config.data_dir);
            let color = Color::random();
            let label = format.unwrap_or(settings.output_format).format(color);
            let mut out = io::stdout().lock();
            print_color(&mut out, color, &label, true)?;
            out.flush()?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "colorsmith=warn",
        1 => "colorsmith=debug",
        _ => "colorsmith=trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(io::stderr),
        )
        .init();
}

fn open_store(config: &Config) -> PaletteStore {
    let mut store = PaletteStore::new(Storage::new(&config.data_dir));
    store.load();
    store
}

fn parse_color(text: &str) -> Result<Color> {
    text.parse::<Color>()
        .with_context(|| format!("could not read '{text}' as a color"))
}

fn verdict(pass: bool) -> &'static str {
    if pass {
        "pass"
    } else {
        "fail"
    }
}

/// Look a palette up by id, then by case-insensitive name.
fn resolve_palette_id(store: &PaletteStore, key: &str) -> Result<String> {
    store
        .palette(key)
        .or_else(|| store.find_by_name(key))
        .map(|p| p.id().to_string())
        .with_context(|| format!("no palette with id or name '{key}'"))
}

fn run_palette(config: &Config, action: PaletteAction) -> Result<()> {
    let mut store = open_store(config);
    let settings = Settings::load(&config.data_dir);

    match action {
        PaletteAction::List => {
            let current = store.current_palette_id().unwrap_or_default();
            for palette in store.palettes() {
                let marker = if palette.id() == current { '*' } else { ' ' };
                let access = if palette.is_read_only() { "ro" } else { "rw" };
                println!(
                    "{marker} {:<36}  {access}  {:>4}  {}",
                    palette.id(),
                    palette.color_count(),
                    palette.name()
                );
            }
        }
        PaletteAction::Show { palette } => {
            let palette = match palette {
                Some(key) => {
                    let id = resolve_palette_id(&store, &key)?;
                    store.palette(&id)
                }
                None => store.current_palette(),
            }
            .context("no palette selected")?;
            let mut out = io::stdout().lock();
            writeln!(out, "{}", palette.name())?;
            for (i, color) in palette.colors().iter().enumerate() {
                let mut label = format!("{i:>3}  {}", settings.output_format.format(*color));
                if let Some(name) = palette.color_name(i) {
                    label.push_str("  ");
                    label.push_str(name);
                }
                print_color(&mut out, *color, &label, true)?;
            }
            out.flush()?;
        }
        PaletteAction::Create { name } => {
            let id = store.create_palette(&name).id().to_string();
            store.save().context("failed to save palettes")?;
            println!("{id}");
        }
        PaletteAction::Delete { palette } => {
            let id = resolve_palette_id(&store, &palette)?;
            if !store.delete_palette(&id) {
                bail!("palette '{palette}' is read-only");
            }
        }
        PaletteAction::Rename { palette, name } => {
            let id = resolve_palette_id(&store, &palette)?;
            store.rename_palette(&id, &name);
            store.save().context("failed to save palettes")?;
        }
        PaletteAction::Add {
            palette,
            color,
            name,
        } => {
            let id = resolve_palette_id(&store, &palette)?;
            let color = parse_color(&color)?;
            if !store.add_color(&id, color, &name) {
                bail!("palette '{palette}' is read-only");
            }
        }
        PaletteAction::Remove { palette, index } => {
            let id = resolve_palette_id(&store, &palette)?;
            if !store.remove_color(&id, index) {
                bail!("cannot remove color {index} from palette '{palette}'");
            }
        }
        PaletteAction::Use { palette } => {
            let id = resolve_palette_id(&store, &palette)?;
            store.set_current_palette(&id);
            store.save().context("failed to save palettes")?;
        }
    }
    Ok(())
}

fn build_gradient(args: &GradientArgs) -> Result<Gradient> {
    if args.random {
        return Ok(Gradient::random());
    }
    let kind = if args.radial {
        GradientKind::Radial
    } else {
        GradientKind::Linear {
            rotation: args.rotation % 360,
        }
    };
    if args.stops.is_empty() {
        let mut gradient = Gradient::default();
        gradient.kind = kind;
        return Ok(gradient);
    }
    let stops = args
        .stops
        .iter()
        .map(|s| s.parse::<GradientStop>().map_err(anyhow::Error::msg))
        .collect::<Result<Vec<_>>>()?;
    Gradient::new(kind, stops).context("a gradient needs at least two stops")
}

/// One output line, optionally led by a true-color swatch.
fn print_color(out: &mut impl Write, color: Color, label: &str, swatch: bool) -> io::Result<()> {
    if swatch {
        let bg = style::Color::Rgb {
            r: color.r,
            g: color.g,
            b: color.b,
        };
        queue!(out, SetBackgroundColor(bg), Print("      "), ResetColor, Print(" "))?;
    }
    queue!(out, Print(label), Print("\n"))
}
