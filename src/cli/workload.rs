//! Workload command arguments

use clap::builder::NonEmptyStringValueParser;
use clap::Parser;

/// Arguments for 'scale' command
#[derive(Parser, Debug)]
#[command(after_help = "QUERY is '<TYPE>[/<NAME>]'; without a name one is selected interactively:\n  \
        kwctl scale deploy/web 3\n  \
        kwctl scale sts 0")]
pub struct ScaleArgs {
    /// Resource query, '<TYPE>[/<NAME>]'
    pub query: String,

    /// Desired number of replicas
    pub replicas: u32,
}

/// Arguments for 'restart' command
#[derive(Parser, Debug)]
pub struct RestartArgs {
    /// Resource query, '<TYPE>[/<NAME>]'
    pub query: String,
}

/// Arguments for 'set-image' command
#[derive(Parser, Debug)]
#[command(after_help = "QUERY is '<TYPE>[/<NAME>[/<CONTAINER>]]':\n  \
        kwctl set-image deploy/web/nginx nginx:1.27\n  \
        kwctl set-image deploy busybox:1.36")]
pub struct SetImageArgs {
    /// Container query, '<TYPE>[/<NAME>[/<CONTAINER>]]'
    pub query: String,

    /// New image
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    pub image: String,
}
