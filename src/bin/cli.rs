//! CLI harness: build a ring, route keys, report distribution

use clap::{Parser, Subcommand};
use miniring::analysis::{compare, DistributionStats, RemapSummary};
use miniring::common::{format_percent, Config, RingMetrics};
use miniring::ring::{RingObserver, TracingObserver};
use miniring::{HashAlgorithm, HashRing, KeyGenerator};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "miniring")]
#[command(about = "Consistent hash ring simulator")]
#[command(version)]
struct Cli {
    /// Config file (default: ./miniring.toml plus MINIRING__* env vars)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Hash algorithm: blake3, sha256, crc32
    #[arg(long, global = true)]
    hash: Option<HashAlgorithm>,

    /// Virtual nodes per server (given before the subcommand)
    #[arg(long)]
    vnodes: Option<usize>,

    /// Server ids (comma-separated)
    #[arg(long, global = true, value_delimiter = ',')]
    servers: Option<Vec<String>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse distribution, optionally after topology changes
    Simulate {
        /// Number of generated keys
        #[arg(long)]
        keys: Option<usize>,

        /// Key generator seed
        #[arg(long)]
        seed: Option<u64>,

        /// Servers to add after the first analysis
        #[arg(long)]
        add: Vec<String>,

        /// Servers to remove after the first analysis
        #[arg(long)]
        remove: Vec<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Print ring metrics (Prometheus format)
        #[arg(long)]
        metrics: bool,
    },

    /// Print the owning server of each key
    Lookup {
        /// Keys to route
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Compare standard deviation across virtual node counts
    Sweep {
        /// Virtual node counts to try (comma-separated)
        #[arg(long, value_delimiter = ',', default_value = "1,10,50,100,200,500")]
        vnodes: Vec<usize>,

        /// Number of generated keys
        #[arg(long)]
        keys: Option<usize>,

        /// Key generator seed
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config from file/env, then override with CLI arguments
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    if let Some(hash) = cli.hash {
        config.ring.hash = hash;
    }
    if let Some(vnodes) = cli.vnodes {
        config.ring.virtual_nodes = vnodes;
    }
    if let Some(servers) = cli.servers {
        config.simulation.servers = servers;
    }
    config.ring.validate()?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Simulate {
            keys,
            seed,
            add,
            remove,
            json,
            metrics,
        } => {
            if let Some(keys) = keys {
                config.simulation.key_count = keys;
            }
            if let Some(seed) = seed {
                config.simulation.seed = seed;
            }
            simulate(&config, &add, &remove, json, metrics)?;
        }

        Commands::Lookup { keys } => {
            let ring = build_ring(&config, Arc::new(TracingObserver))?;
            for key in keys {
                println!("{} -> {}", key, ring.lookup(&key)?);
            }
        }

        Commands::Sweep { vnodes, keys, seed } => {
            let key_count = keys.unwrap_or(config.simulation.key_count);
            let seed = seed.unwrap_or(config.simulation.seed);
            let keys = KeyGenerator::seeded(seed).generate(key_count);

            println!(
                "Sweep over {} keys, {} servers ({}):",
                key_count,
                config.simulation.servers.len(),
                config.ring.hash
            );
            for count in vnodes {
                let mut sweep_config = config.clone();
                sweep_config.ring.virtual_nodes = count;
                let ring = build_ring(&sweep_config, Arc::new(TracingObserver))?;
                let stats = ring.analyze(&keys)?;
                println!(
                    "  vnodes={:<6} std_dev={:<12} peak/mean={:.4}",
                    count,
                    stats.std_deviation_or_sentinel(),
                    stats.peak_to_mean().unwrap_or(0.0)
                );
            }
        }
    }

    Ok(())
}

fn build_ring(config: &Config, observer: Arc<dyn RingObserver>) -> anyhow::Result<HashRing> {
    let ring = HashRing::with_config(&config.ring)?.with_observer(observer);
    for server in &config.simulation.servers {
        ring.add_server(server)?;
    }
    Ok(ring)
}

fn simulate(
    config: &Config,
    add: &[String],
    remove: &[String],
    json: bool,
    with_metrics: bool,
) -> anyhow::Result<()> {
    let metrics = Arc::new(RingMetrics::new());
    let observer: Arc<dyn RingObserver> = if with_metrics {
        metrics.clone()
    } else {
        Arc::new(TracingObserver)
    };
    let ring = build_ring(config, observer)?;

    let keys = KeyGenerator::seeded(config.simulation.seed).generate(config.simulation.key_count);
    let before = ring.snapshot();
    let initial = ring.analyze(&keys)?;

    let mut changed = None;
    if !add.is_empty() || !remove.is_empty() {
        for server in add {
            ring.add_server(server)?;
        }
        for server in remove {
            ring.remove_server(server)?;
        }
        let after = ring.snapshot();
        let stats = ring.analyze(&keys)?;
        let remap = compare(&before, &after, &keys)?;
        changed = Some((after.fingerprint(), stats, remap));
    }

    if json {
        let mut report = serde_json::json!({
            "hash": config.ring.hash,
            "virtual_nodes": ring.virtual_nodes_per_server(),
            "initial": { "fingerprint": before.fingerprint(), "stats": initial },
        });
        if let Some((fingerprint, stats, remap)) = &changed {
            report["after"] = serde_json::json!({
                "fingerprint": fingerprint,
                "stats": stats,
                "remap": remap,
                "moved_fraction": remap.moved_fraction(),
            });
        }
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_stats("Initial distribution", &before.fingerprint(), &initial, &ring);
        if let Some((fingerprint, stats, remap)) = &changed {
            print_stats("Distribution after topology change", fingerprint, stats, &ring);
            print_remap(remap);
        }
    }

    if with_metrics {
        print!("{}", metrics.to_prometheus());
    }

    Ok(())
}

fn print_stats(title: &str, fingerprint: &str, stats: &DistributionStats, ring: &HashRing) {
    println!("{}:", title);
    println!("  Ring fingerprint: {}", fingerprint);
    println!("  Total keys: {}", stats.total_keys);
    println!(
        "  Servers: {} ({} virtual nodes each, {})",
        stats.server_count(),
        ring.virtual_nodes_per_server(),
        ring.hasher_name()
    );
    println!("  Mean keys per server: {}", stats.mean);
    println!("  Std deviation: {}", stats.std_deviation_or_sentinel());
    for (server, count) in &stats.servers {
        println!("    {} has {} keys", server, count);
    }
}

fn print_remap(remap: &RemapSummary) {
    println!("Remap report:");
    println!(
        "  Keys moved: {} of {} ({})",
        remap.moved,
        remap.total_keys,
        format_percent(remap.moved_fraction())
    );
    for (server, count) in &remap.moved_from {
        println!("    {} gave up {} keys", server, count);
    }
    for (server, count) in &remap.moved_to {
        println!("    {} took {} keys", server, count);
    }
}
