use anyhow::Result;
use clap::{Parser, ValueEnum};

use watercolor_engine::device::GpuInit;
use watercolor_engine::logging::{init_logging, LoggingConfig};
use watercolor_fx::{Application, ExperienceConfig, Variant};

#[derive(Parser)]
#[command(name = "watercolor-studio", about = "Interactive watercolor feedback effect")]
struct Cli {
    /// Scene to run
    #[arg(long, value_enum, default_value_t = VariantArg::Watercolor)]
    variant: VariantArg,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 720.0)]
    height: f64,

    /// Present without waiting for vsync
    #[arg(long)]
    no_vsync: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn gpu_init(&self) -> GpuInit {
        if self.no_vsync {
            GpuInit::default().unthrottled()
        } else {
            GpuInit::default()
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum VariantArg {
    /// Rotating cube, no feedback
    Cube,
    /// Cube and cursor marker with watercolor trails
    Watercolor,
}

impl From<VariantArg> for Variant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Cube => Variant::Cube,
            VariantArg::Watercolor => Variant::Watercolor,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(if cli.verbose { LoggingConfig::verbose() } else { LoggingConfig::default() });

    let config = ExperienceConfig {
        variant: cli.variant.into(),
        width: cli.width,
        height: cli.height,
        ..ExperienceConfig::default()
    };
    log::info!("starting {:?} at {}x{}", config.variant, config.width, config.height);

    Application::with_config(config).gpu_init(cli.gpu_init()).run()
}
