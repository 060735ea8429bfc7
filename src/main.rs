use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use cutkit::{
    compile_options, init_logging_with_level, plot, sink_for, ByteSink, Config, MediaSize,
    MemorySink, OutputMode, RegistrationMode, SvgDrawing, TcpSink,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "cutkit", version, about = "Compile SVG cut layers for drag-knife plotters")]
struct Cli {
    /// Log at debug level (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a drawing and send or save the program
    Plot(PlotArgs),
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Debug)]
struct PlotArgs {
    /// SVG drawing with a "Cut" layer
    input: PathBuf,

    /// Configuration file (.toml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Registration mode: marker or bbox
    #[arg(long)]
    mode: Option<RegistrationMode>,

    /// Write the program to PATH
    #[arg(long, value_name = "PATH", conflicts_with = "send")]
    save: Option<PathBuf>,

    /// Stream the program to a plotter at HOST:PORT
    #[arg(long, value_name = "HOST:PORT")]
    send: Option<String>,

    #[arg(long, value_name = "MM")]
    knife_offset: Option<f64>,

    #[arg(long, value_name = "MM")]
    overcut: Option<f64>,

    /// Samples per curve segment
    #[arg(long, value_name = "N")]
    steps: Option<u32>,

    /// Media size: a4p, a4l, a3p or a3l
    #[arg(long)]
    media: Option<MediaSize>,

    /// Print the program instead of delivering it
    #[arg(long)]
    dry_run: bool,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Target file, defaults to the platform config location
        path: Option<PathBuf>,
    },
    /// Print the effective configuration as TOML
    Show {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    init_logging_with_level(level)?;
    tracing::debug!("cutkit {} built {}", cutkit::VERSION, cutkit::BUILD_DATE);

    match cli.command {
        Command::Plot(args) => run_plot(args),
        Command::Config { action } => run_config(action),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    Config::load_or_default(path).context("Failed to load configuration")
}

fn apply_overrides(config: &mut Config, args: &PlotArgs) -> anyhow::Result<()> {
    if let Some(mode) = args.mode {
        config.registration.mode = mode;
    }
    if let Some(k) = args.knife_offset {
        config.cutting.knife_offset_mm = k;
    }
    if let Some(len) = args.overcut {
        config.cutting.overcut_mm = len;
    }
    if let Some(steps) = args.steps {
        config.cutting.steps_per_segment = steps;
    }
    if let Some(media) = args.media {
        config.media.size = media;
    }
    if let Some(path) = &args.save {
        config.output.mode = OutputMode::File;
        config.output.path = path.display().to_string();
    }
    config.validate().context("Invalid option")?;
    Ok(())
}

fn run_plot(args: PlotArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    apply_overrides(&mut config, &args)?;

    let mut sink: Box<dyn ByteSink> = if args.dry_run {
        Box::new(MemorySink::new())
    } else if let Some(address) = &args.send {
        let timeout = Duration::from_millis(config.connection.timeout_ms);
        Box::new(TcpSink::from_address(address, timeout)?)
    } else {
        sink_for(&config)?
    };

    let svg = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let drawing = SvgDrawing::parse(&svg)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;

    let report = plot(&drawing, &compile_options(&config), sink.as_mut())
        .with_context(|| format!("Failed to compile {}", args.input.display()))?;

    if args.dry_run {
        println!("{}", report.program);
        return Ok(());
    }

    match report.delivery {
        Ok(receipt) => {
            println!("Sent {} bytes to {}", receipt.bytes_written, receipt.target);
            Ok(())
        }
        Err(e) => bail!("Program compiled but was not delivered: {}", e),
    }
}

fn run_config(action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init { path } => {
            let path = match path {
                Some(path) => path,
                None => Config::default_path()?,
            };
            if path.exists() {
                bail!("{} already exists", path.display());
            }
            Config::default()
                .save_to_file(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote default configuration to {}", path.display());
        }
        ConfigAction::Show { config } => {
            let config = load_config(config.as_deref())?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
