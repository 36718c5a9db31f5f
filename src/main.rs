mod app;
mod assets;
mod config;
mod data_source;
mod ui;

use clap::Parser;
use std::path::PathBuf;

use app::ViewerApp;
use config::AppConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Desktop viewer for the PVE destination and activity archive")]
struct Args {
    /// Archive JSON: a file path or an http(s) URL
    #[arg(short, long)]
    data: Option<String>,
    /// Directory that relative asset paths resolve against
    #[arg(long)]
    assets: Option<PathBuf>,
    /// Base URL for relative asset paths
    #[arg(long)]
    asset_base_url: Option<String>,
    /// Tab shown at startup: destinations or locations
    #[arg(long)]
    tab: Option<String>,
    /// Log filter, e.g. "debug" or "atlas_core=trace"; overrides RUST_LOG
    #[arg(long)]
    log_level: Option<String>,
    /// Print the configuration file path and exit
    #[arg(long, default_value_t = false)]
    print_config_path: bool,
}

impl Args {
    /// Session overrides; nothing here is written back to the config file
    fn apply(&self, config: &mut AppConfig) {
        if let Some(data) = &self.data {
            config.data_source.clone_from(data);
        }
        if let Some(assets) = &self.assets {
            config.asset_root = assets.display().to_string();
        }
        if let Some(base_url) = &self.asset_base_url {
            config.asset_base_url = Some(base_url.clone());
        }
        if let Some(tab) = &self.tab {
            config.initial_tab.clone_from(tab);
        }
    }
}

fn init_logging(level: Option<&str>) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(level) = level {
        builder.parse_filters(level);
    }
    builder.init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    if args.print_config_path {
        println!("{}", AppConfig::get_config_path()?.display());
        return Ok(());
    }

    log::info!("Starting PVE Atlas...");

    let mut config = AppConfig::load_or_default();
    args.apply(&mut config);
    log::debug!("Effective configuration: {config:?}");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("pve-atlas-io")
        .build()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([720.0, 480.0])
            .with_title("PVE Atlas"),
        ..Default::default()
    };

    eframe::run_native(
        "PVE Atlas",
        options,
        Box::new(move |cc| Ok(Box::new(ViewerApp::new(cc, &config, runtime)))),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_core::Tab;

    #[test]
    fn test_cli_overrides_config() {
        let args = Args::try_parse_from([
            "pve-atlas",
            "--data",
            "https://example.com/archive.json",
            "--assets",
            "/srv/atlas",
            "--tab",
            "locations",
        ])
        .unwrap();

        let mut config = AppConfig::default();
        args.apply(&mut config);
        assert_eq!(config.data_source, "https://example.com/archive.json");
        assert_eq!(config.asset_root, "/srv/atlas");
        assert_eq!(config.initial_tab(), Tab::Locations);
        assert_eq!(config.asset_base_url, None);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let args = Args::try_parse_from(["pve-atlas"]).unwrap();
        let mut config = AppConfig::default();
        args.apply(&mut config);
        assert_eq!(config, AppConfig::default());
        assert!(!args.print_config_path);
    }
}
