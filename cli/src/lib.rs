//! typi CLI (made by FontLab https://www.fontlab.com/)

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};
use log::info;

use typi_core::error::TypiError;
use typi_core::font::{InstalledFont, Typeface};
use typi_core::install::{installer_for, DirectoryInstall, Installer};
use typi_core::manifest::{default_manifest_path, AddOutcome, Manifest};
use typi_core::metadata;
use typi_core::platform::Platform;
use typi_core::uninstall::{uninstall_fonts, SystemTrash};
use typi_core::variant::FontVariant;

/// CLI entrypoint for typi.
#[derive(Debug, Parser)]
#[command(
    name = "typi",
    about = "Installed-font tracking and install/uninstall (made by FontLab https://www.fontlab.com/)"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List installed typefaces and their variants
    List(ListArgs),
    /// Install font files onto this system
    Install(InstallArgs),
    /// Uninstall a typeface, or some of its variants
    Uninstall(UninstallArgs),
}

#[derive(Debug, Args)]
struct CommonArgs {
    /// Manifest file location (defaults to the per-user data directory)
    #[arg(long = "manifest-path", value_hint = ValueHint::FilePath)]
    manifest_path: Option<PathBuf>,

    /// Platform family to operate as (defaults to the host platform)
    #[arg(long = "platform", value_enum)]
    platform: Option<PlatformArg>,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Typeface name to show (all typefaces when omitted)
    name: Vec<String>,

    /// Emit the manifest entries as JSON
    #[arg(long = "json", action = ArgAction::SetTrue)]
    json: bool,

    /// Control colorized output (auto|always|never)
    #[arg(long = "color", default_value_t = ColorChoice::Auto, value_enum)]
    color: ColorChoice,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Debug, Args)]
struct InstallArgs {
    /// Font files to install
    #[arg(required = true, value_hint = ValueHint::FilePath)]
    files: Vec<PathBuf>,

    /// Install into this directory instead of the OS font store
    #[arg(long = "dir", value_hint = ValueHint::DirPath)]
    dir: Option<PathBuf>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Debug, Args)]
struct UninstallArgs {
    /// Typeface name (multiple words are joined)
    #[arg(required = true)]
    name: Vec<String>,

    /// Only uninstall these variants (comma-separated, e.g. 700,700i)
    #[arg(short = 'v', long = "variants", value_delimiter = ',')]
    variants: Vec<String>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum PlatformArg {
    Macos,
    Windows,
    Linux,
}

impl PlatformArg {
    fn to_platform(self) -> Platform {
        match self {
            PlatformArg::Macos => Platform::MacOs,
            PlatformArg::Windows => Platform::Windows,
            PlatformArg::Linux => Platform::Linux,
        }
    }
}

/// Parse CLI args and execute the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::List(args) => run_list(args),
        Command::Install(args) => run_install(args),
        Command::Uninstall(args) => run_uninstall(args),
    }
}

fn run_list(args: ListArgs) -> Result<()> {
    let path = resolve_manifest_path(&args.common)?;
    let platform = resolve_platform(&args.common);
    let manifest = load_or_generate(&path, platform)?;

    let name = args.name.join(" ");
    let mut typefaces: Vec<&Typeface> = if name.is_empty() {
        manifest.typefaces.iter().collect()
    } else {
        vec![manifest
            .get(&name)
            .ok_or_else(|| anyhow!("no typeface found with the name '{name}'"))?]
    };
    typefaces.sort_by_key(|t| t.name.to_lowercase());

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if args.json {
        let json = serde_json::to_string_pretty(&typefaces)?;
        writeln!(handle, "{json}")?;
        return Ok(());
    }

    let use_color = match args.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => handle.is_terminal(),
    };
    write_typefaces(&typefaces, &mut handle, use_color)?;

    Ok(())
}

fn run_install(args: InstallArgs) -> Result<()> {
    let path = resolve_manifest_path(&args.common)?;
    let platform = resolve_platform(&args.common);
    let mut manifest = load_or_generate(&path, platform)?;

    let mut fonts = read_font_records(&args.files)?;

    let installer: Box<dyn Installer> = match &args.dir {
        Some(dir) => Box::new(DirectoryInstall::new(dir.clone())),
        None => installer_for(platform)?,
    };
    installer.install(&mut fonts)?;

    for font in fonts {
        let family = font.family.clone();
        let variant = font.variant;

        if !font.is_installed() {
            println!("skipped {family} ({variant}): installation is not supported on this platform");
            continue;
        }

        match manifest.add(font) {
            AddOutcome::Added => println!("installed {family} ({variant})"),
            AddOutcome::AlreadyPresent => println!("{family} ({variant}) is already installed"),
        }
    }

    manifest.save(&path)?;
    Ok(())
}

fn run_uninstall(args: UninstallArgs) -> Result<()> {
    let path = resolve_manifest_path(&args.common)?;
    let platform = resolve_platform(&args.common);
    let mut manifest = load_or_generate(&path, platform)?;

    let name = args.name.join(" ");
    let requested = parse_variant_list(&args.variants)?;

    let (fonts, selected, display_name) = {
        let typeface = manifest
            .get(&name)
            .ok_or_else(|| anyhow!("no typeface found with the name '{name}'"))?;
        let selected = if requested.is_empty() {
            typeface.variants()
        } else {
            requested.clone()
        };
        let fonts = typeface.fonts_for(&selected)?;
        (fonts, selected, typeface.name.clone())
    };

    match uninstall_fonts(&fonts, &SystemTrash) {
        Ok(_) => {
            if requested.is_empty() {
                manifest.remove(&name, None)?;
            } else {
                manifest.remove(&name, Some(&selected))?;
            }
            manifest.save(&path)?;
            println!(
                "uninstalled {display_name} ({})",
                render_variants(&selected)
            );
            Ok(())
        }
        Err(TypiError::PartialUninstall {
            removed,
            total,
            failed,
        }) => {
            // Keep the manifest honest: drop only the entries whose files
            // actually made it to the trash.
            let trashed: Vec<FontVariant> = fonts
                .iter()
                .filter(|f| !failed.contains(&f.path))
                .map(|f| f.variant)
                .collect();
            if !trashed.is_empty() {
                manifest.remove(&name, Some(&trashed))?;
                manifest.save(&path)?;
            }
            bail!("uninstalled only {removed} of {total} fonts from '{display_name}'");
        }
        Err(err) => Err(err.into()),
    }
}

fn resolve_platform(common: &CommonArgs) -> Platform {
    common
        .platform
        .map(PlatformArg::to_platform)
        .unwrap_or_else(Platform::current)
}

fn resolve_manifest_path(common: &CommonArgs) -> Result<PathBuf> {
    match &common.manifest_path {
        Some(path) => Ok(path.clone()),
        None => default_manifest_path()
            .ok_or_else(|| anyhow!("could not determine a manifest location for this user")),
    }
}

/// Load the manifest, regenerating it from the live font directories when
/// no persisted copy exists yet.
fn load_or_generate(path: &Path, platform: Platform) -> Result<Manifest> {
    match Manifest::load(path) {
        Ok(manifest) => Ok(manifest),
        Err(TypiError::ManifestMissing(_)) => {
            info!("no manifest at {}; scanning installed fonts", path.display());
            let mut manifest = Manifest::generate(&platform.user_font_dirs())?;
            manifest.save(path)?;
            Ok(manifest)
        }
        Err(err) => Err(err.into()),
    }
}

/// Read each file into a pending install record, one per face it contains.
fn read_font_records(files: &[PathBuf]) -> Result<Vec<InstalledFont>> {
    let mut fonts = Vec::new();

    for file in files {
        let bytes =
            fs::read(file).with_context(|| format!("reading font file {}", file.display()))?;
        let file_name = file
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| anyhow!("font file {} has no usable file name", file.display()))?;

        for face in metadata::read_faces(file)? {
            let variant: FontVariant = face
                .style
                .parse()
                .with_context(|| format!("style of {}", file.display()))?;
            fonts.push(InstalledFont::pending(
                face.family,
                variant,
                file_name.clone(),
                bytes.clone(),
            ));
        }
    }

    Ok(fonts)
}

fn parse_variant_list(raw: &[String]) -> Result<Vec<FontVariant>> {
    let mut variants = Vec::new();
    for chunk in raw {
        for token in chunk.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            variants.push(token.parse::<FontVariant>()?);
        }
    }
    variants.sort();
    variants.dedup();
    Ok(variants)
}

fn render_variants(variants: &[FontVariant]) -> String {
    variants
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_typefaces(typefaces: &[&Typeface], mut w: impl Write, color: bool) -> Result<()> {
    for typeface in typefaces {
        let name = apply_color(&typeface.name, color, AnsiColor::Cyan);
        let variants = apply_color(&render_variants(&typeface.variants()), color, AnsiColor::Green);
        writeln!(w, "{name} ({variants})")?;
    }
    Ok(())
}

#[derive(Copy, Clone)]
enum AnsiColor {
    Cyan,
    Green,
}

fn apply_color(text: &str, color: bool, code: AnsiColor) -> String {
    if !color {
        return text.to_string();
    }

    let code_str = match code {
        AnsiColor::Cyan => "36",
        AnsiColor::Green => "32",
    };

    format!("\u{1b}[{}m{}\u{1b}[0m", code_str, text)
}
