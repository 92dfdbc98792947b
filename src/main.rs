use cidr_planner::config::PlannerConfig;
use cidr_planner::error::CidrError;
use cidr_planner::models::{calculate_subnet, PlanRequest};
use cidr_planner::output::{print_subnet_csv, print_tree};
use cidr_planner::planner::{
    generate_network_plan, generate_network_plan_with, list_deployment_tiers,
};
use cidr_planner::processing::SubnetTree;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::error::Error;

#[derive(Parser, Debug)]
#[command(version, about = "IPv4 subnet calculator and Kubernetes network planner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show everything derived from one CIDR block
    Calc { cidr: String },
    /// Split a block into halves, repeatedly
    Split {
        cidr: String,
        /// How many times to halve
        #[arg(short, long, default_value_t = 1)]
        levels: u8,
        /// Show only the leaves
        #[arg(long)]
        hide_parents: bool,
        /// Print CSV instead of a tree
        #[arg(long)]
        csv: bool,
    },
    /// Generate a cluster network plan
    Plan {
        /// Deployment size (micro, standard, professional, enterprise, hyperscale)
        #[arg(short, long)]
        size: String,
        #[arg(short, long)]
        provider: Option<String>,
        /// Private VPC block; a random /16 when omitted
        #[arg(long)]
        vpc: Option<String>,
        #[arg(short, long)]
        region: Option<String>,
        #[arg(short, long)]
        name: Option<String>,
        /// Seed for the random VPC choice
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Generate a plan from a JSON request file ("-" reads stdin)
    Request { file: String },
    /// List deployment tiers
    Tiers { name: Option<String> },
}

fn main() {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let config = PlannerConfig::from_env();
    if let Err(e) = log4rs::init_file(&config.log_config, Default::default()) {
        eprintln!("logging disabled, cannot load {}: {e}", config.log_config);
    }
    log::info!("#Start main()");

    if let Err(e) = run(Cli::parse().command, &config) {
        let cidr_error = e.downcast_ref::<CidrError>();
        match cidr_error {
            Some(err) if err.is_client_error() => log::warn!("rejected: {err}"),
            _ => log::error!("failed: {e}"),
        }
        eprintln!("error: {e}");
        std::process::exit(cidr_error.map_or(1, CidrError::exit_code));
    }
}

fn run(command: Command, config: &PlannerConfig) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Calc { cidr } => {
            let info = calculate_subnet(&cidr)?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Command::Split {
            cidr,
            levels,
            hide_parents,
            csv,
        } => {
            let mut tree = SubnetTree::new(&cidr)?;
            let root = tree.root().cidr;
            tree.split_to_depth(&root, levels)?;
            log::info!("split {root} into {} nodes", tree.node_count());

            let expanded: HashSet<_> = tree.collect_all().iter().map(|n| n.cidr).collect();
            let rows = tree.collect_visible(hide_parents, &expanded);
            if csv {
                print_subnet_csv(&rows);
            } else {
                print_tree(&rows, root.prefix());
            }
        }
        Command::Plan {
            size,
            provider,
            vpc,
            region,
            name,
            seed,
        } => {
            let request = PlanRequest {
                deployment_size: size,
                provider: provider.or(Some(config.provider.clone())),
                vpc_cidr: vpc,
                region: region.or(config.region.clone()),
                deployment_name: name,
            };
            let plan = match seed {
                Some(seed) => generate_network_plan_with(
                    &request,
                    &mut StdRng::seed_from_u64(seed),
                    chrono::Utc::now(),
                )?,
                None => generate_network_plan(&request)?,
            };
            log::info!("plan for {} uses vpc {}", plan.deployment_size, plan.vpc_cidr);
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Command::Request { file } => {
            let json = if file == "-" {
                std::io::read_to_string(std::io::stdin())?
            } else {
                std::fs::read_to_string(&file)?
            };
            let mut request = PlanRequest::from_json(&json)?;
            request.provider = request.provider.or(Some(config.provider.clone()));
            request.region = request.region.or(config.region.clone());
            let plan = generate_network_plan(&request)?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Command::Tiers { name } => {
            let tiers = list_deployment_tiers(name.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&tiers)?);
        }
    }

    Ok(())
}
