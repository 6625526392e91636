//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! dimensionar recommend --params 70 --workload inference --budget 20000
//! dimensionar utilization --needed-gb 16 --device rtx-4090 --safety
//! dimensionar multi-device --needed-gb 150 --per-device-gb 80
//! dimensionar breakdown --params 7 --workload training
//! dimensionar rate --workload training
//! dimensionar compare h100-80gb a100-80gb
//! dimensionar predict rtx-4090 --params 13 --batch-size 4
//! dimensionar fragmentation --sizes-mb 64,512,2048 --pattern random
//! ```

mod analysis;
mod core;
mod types;

pub use analysis::{CompareArgs, FragmentationArgs, PredictArgs, RateArgs};
pub use core::{
    parse_args, BreakdownArgs, Cli, Command, MultiDeviceArgs, RecommendArgs, UtilizationArgs,
};
pub use types::{ModelArgs, OutputFormat};
