use clap::{Parser, Subcommand};
use std::path::PathBuf;
use taximg::detect::{DeviceDetector, FixedDevice, UserAgentDevice};
use taximg::device::DeviceCategory;
use taximg::store::{FileStore, ImageKey, ImageStore, TermId};
use taximg::{form, output, render, resolver, settings, shortcode};

/// Shared flags for commands that classify the requesting device.
#[derive(clap::Args, Clone)]
struct DeviceArgs {
    /// Classify this user-agent string
    #[arg(long, conflicts_with = "device")]
    user_agent: Option<String>,

    /// Force one device category by slug (android, ios, windowsph, mobile, tablet, desktop)
    #[arg(long)]
    device: Option<DeviceCategory>,
}

impl DeviceArgs {
    /// Build the detector plus a description for output. Neither flag means
    /// an unclassified requester, which only the desktop catch-all matches.
    fn detector(&self) -> (Box<dyn DeviceDetector>, String) {
        if let Some(category) = self.device {
            (
                Box::new(FixedDevice::from(category)),
                format!("{} (forced)", category.slug()),
            )
        } else if let Some(user_agent) = &self.user_agent {
            let classified = UserAgentDevice::classify(user_agent);
            let description = classified.describe();
            (Box::new(classified), description)
        } else {
            (Box::new(FixedDevice::default()), "unclassified".to_string())
        }
    }
}

#[derive(Parser)]
#[command(name = "taximg")]
#[command(about = "Device-aware images for taxonomy terms")]
#[command(long_about = "\
Device-aware images for taxonomy terms

Each term can carry one image URL per device class. Requests resolve
through an ordered fallback walk over the enabled device categories.

Data directory layout:

  .
  ├── settings.toml        # enabled taxonomies + device priority order
  └── term-images.json     # per-term URL bindings

Resolution, per request:
  1. Start from the any-device image ('universal' wins over 'any')
  2. Walk [advanced] enabled_devices in configured order
  3. The first category matching the requester is final: a blank slot
     means that device class gets no image, not someone else's

Run 'taximg config gen' to print a documented settings.toml.")]
#[command(version)]
struct Cli {
    /// Data directory holding settings.toml and term-images.json
    #[arg(long, default_value = ".", global = true)]
    dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store image URLs for a term
    Set {
        /// Target term id
        #[arg(long)]
        term: TermId,
        /// Assignments like android=http://... (slug or 'any'; empty value clears)
        #[arg(required = true, value_name = "SLUG=URL")]
        assignments: Vec<String>,
    },
    /// Read a stored binding, or the effective any-device image
    Get {
        /// Target term id
        #[arg(long)]
        term: TermId,
        /// Slot to read raw: a device slug, 'any', or 'universal'
        #[arg(long)]
        device: Option<String>,
    },
    /// Resolve the image a device would receive for a term
    Resolve {
        /// Target term id
        #[arg(long)]
        term: TermId,
        #[command(flatten)]
        device: DeviceArgs,
    },
    /// Render the template output: URL, <img> element, or notice
    Render {
        /// Current term (omit for no ambient term)
        #[arg(long, default_value_t = 0)]
        term: TermId,
        /// Emit a full <img> element instead of the bare URL
        #[arg(long)]
        img_tag: bool,
        /// Class for the <img> element (repeatable)
        #[arg(long = "class", value_name = "CLASS")]
        classes: Vec<String>,
        #[command(flatten)]
        device: DeviceArgs,
    },
    /// Expand a shortcode string, e.g. '[tax_image term_id="5"]'
    Shortcode {
        /// Shortcode text, with or without the [tax_image ...] wrapper
        input: String,
        /// Ambient term used when the attributes name none
        #[arg(long)]
        term: Option<TermId>,
        #[command(flatten)]
        device: DeviceArgs,
    },
    /// List stored bindings with availability and usage hints
    List {
        /// Limit to one term
        #[arg(long)]
        term: Option<TermId>,
    },
    /// Report settings plus binding consistency notes
    Check,
    /// Show the device catalog with fallback priorities
    Devices,
    /// Inspect or edit settings.toml
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print a stock settings.toml with all options documented
    Gen,
    /// Show the effective settings (defaults plus file overlay)
    List,
    /// Read one option, addressed as section.option
    Get {
        key: String,
        /// Value to report when the option is not set
        #[arg(long)]
        default: Option<String>,
    },
    /// Set one option, addressed as section.option
    Set { key: String, value: String },
    /// Remove one option, addressed as section.option
    Unset { key: String },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Set { term, assignments } => {
            let mut pairs = Vec::new();
            for assignment in &assignments {
                let Some((slug, url)) = assignment.split_once('=') else {
                    return Err(format!("expected SLUG=URL, got '{assignment}'").into());
                };
                let key: ImageKey = slug.parse()?;
                pairs.push((key.meta_key(), url.to_string()));
            }
            let mut store = FileStore::load(&cli.dir)?;
            form::save_image_urls(&mut store, term, &pairs);
            store.save(&cli.dir)?;
            let settings = settings::load_settings(&cli.dir)?;
            for line in output::format_term_output(&store, &settings, term) {
                println!("{}", line);
            }
        }
        Command::Get { term, device } => {
            let store = FileStore::load(&cli.dir)?;
            match device {
                Some(slug) => {
                    let key: ImageKey = slug.parse()?;
                    match store.get(term, key) {
                        Some(url) if !url.is_empty() => println!("{}", url),
                        Some(_) => println!("(blank)"),
                        None => println!("(not set)"),
                    }
                }
                None => match store.any_device_image(term) {
                    Some(url) if !url.is_empty() => println!("{}", url),
                    _ => println!("(no any-device image)"),
                },
            }
        }
        Command::Resolve { term, device } => {
            let store = FileStore::load(&cli.dir)?;
            let settings = settings::load_settings(&cli.dir)?;
            let (detector, description) = device.detector();
            let resolution = resolver::resolve(&store, &settings, term, detector.as_ref());
            output::print_resolve_output(term, &description, &resolution);
        }
        Command::Render {
            term,
            img_tag,
            classes,
            device,
        } => {
            let store = FileStore::load(&cli.dir)?;
            let settings = settings::load_settings(&cli.dir)?;
            let (detector, _) = device.detector();
            let outcome =
                render::taxonomy_image(&store, &settings, detector.as_ref(), term, img_tag, &classes);
            println!("{}", outcome);
        }
        Command::Shortcode {
            input,
            term,
            device,
        } => {
            let store = FileStore::load(&cli.dir)?;
            let settings = settings::load_settings(&cli.dir)?;
            let (detector, _) = device.detector();
            println!(
                "{}",
                shortcode::tax_image_shortcode(&store, &settings, detector.as_ref(), &input, term)
            );
        }
        Command::List { term } => {
            let store = FileStore::load(&cli.dir)?;
            let settings = settings::load_settings(&cli.dir)?;
            match term {
                Some(term) => {
                    for line in output::format_term_output(&store, &settings, term) {
                        println!("{}", line);
                    }
                }
                None => output::print_list_output(&store, &settings),
            }
        }
        Command::Check => {
            let store = FileStore::load(&cli.dir)?;
            let settings = settings::load_settings(&cli.dir)?;
            output::print_check_output(&store, &settings);
        }
        Command::Devices => {
            let settings = settings::load_settings(&cli.dir)?;
            output::print_devices_output(&settings);
        }
        Command::Config { action } => match action {
            ConfigAction::Gen => {
                print!("{}", settings::stock_settings_toml());
            }
            ConfigAction::List => {
                let settings = settings::load_settings(&cli.dir)?;
                print!("{}", toml::to_string_pretty(&settings)?);
            }
            ConfigAction::Get { key, default } => {
                let (section, option) = split_key(&key)?;
                let doc = settings::load_raw_settings(&cli.dir)?.unwrap_or_else(empty_table);
                let fallback = match default {
                    Some(text) => parse_value(&text),
                    None => settings::get_option(
                        &settings::stock_defaults_value(),
                        option,
                        section,
                        toml::Value::String("(not set)".to_string()),
                    ),
                };
                print_value(&settings::get_option(&doc, option, section, fallback));
            }
            ConfigAction::Set { key, value } => {
                let (section, option) = split_key(&key)?;
                let mut doc = settings::load_raw_settings(&cli.dir)?.unwrap_or_else(empty_table);
                settings::set_option(&mut doc, option, section, parse_value(&value));
                // Reject documents the loader would refuse
                settings::resolve_settings(settings::stock_defaults_value(), Some(doc.clone()))?;
                settings::save_raw_settings(&cli.dir, &doc)?;
                println!("Set {}", key);
            }
            ConfigAction::Unset { key } => {
                let (section, option) = split_key(&key)?;
                match settings::load_raw_settings(&cli.dir)? {
                    Some(mut doc) => {
                        if settings::unset_option(&mut doc, option, section) {
                            settings::save_raw_settings(&cli.dir, &doc)?;
                            println!("Removed {}", key);
                        } else {
                            println!("{} is not set", key);
                        }
                    }
                    None => println!("{} is not set", key),
                }
            }
        },
    }

    Ok(())
}

/// Split a dotted `section.option` key.
fn split_key(key: &str) -> Result<(&str, &str), Box<dyn std::error::Error>> {
    match key.split_once('.') {
        Some((section, option)) if !section.is_empty() && !option.is_empty() => {
            Ok((section, option))
        }
        _ => Err(format!("expected a section.option key, got '{key}'").into()),
    }
}

/// Parse CLI text as a TOML value; unparseable text becomes a string.
fn parse_value(text: &str) -> toml::Value {
    let wrapped = format!("v = {text}");
    match toml::from_str::<toml::Value>(&wrapped) {
        Ok(toml::Value::Table(mut table)) => table
            .remove("v")
            .unwrap_or_else(|| toml::Value::String(text.to_string())),
        _ => toml::Value::String(text.to_string()),
    }
}

/// Print a TOML value: bare strings unquoted, everything else as TOML.
fn print_value(value: &toml::Value) {
    match value {
        toml::Value::String(s) => println!("{}", s),
        other => println!("{}", other),
    }
}

fn empty_table() -> toml::Value {
    toml::Value::Table(toml::map::Map::new())
}
