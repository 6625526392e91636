//! Configuration: the engine config file and the command-line interface.

mod cli;
mod engine;

pub use cli::{
    parse_args, BreakdownArgs, Cli, Command, CompareArgs, FragmentationArgs, ModelArgs,
    MultiDeviceArgs, OutputFormat, PredictArgs, RateArgs, RecommendArgs, UtilizationArgs,
};
pub use engine::{load_config, EngineConfig};
