use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use nicswap::adapters::AzCliClient;
use nicswap::constants::{BIN_NAME, DEFAULT_AZ_BIN};
use nicswap::logging::StderrSink;
use nicswap::policy::{CleanupPolicy, Policy, StartWait};
use nicswap::types::{ApplyMode, RunMode, RunReport, SwapInput};
use nicswap::NicSwap;

#[derive(Parser, Debug)]
#[command(
    name = "nicswap",
    about = "Hand the ZCA VM's private address to the ZVM appliance VM \
             and move the ZCA to an alternative address",
    version
)]
struct Cli {
    /// Address the ZCA VM currently holds (taken over by the appliance)
    #[arg(long = "original-zca-ip", value_name = "IPV4")]
    original_zca_ip: String,

    /// Address of the ZVM appliance VM
    #[arg(long = "original-zvm-appliance-ip", value_name = "IPV4")]
    original_zvm_appliance_ip: String,

    /// Address the ZCA VM moves to
    #[arg(long = "alternative-zca-ip", value_name = "IPV4")]
    alternative_zca_ip: String,

    /// Undo a previous swap made with the same three addresses
    #[arg(long)]
    revert: bool,

    /// Print every step and emitted fact
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Resolve and check everything, print the plan, change nothing
    #[arg(long)]
    dry_run: bool,

    /// Wait for each VM start to complete instead of returning immediately
    #[arg(long)]
    wait_for_start: bool,

    /// On --revert, leave the alternative NIC in place instead of deleting it
    #[arg(long)]
    keep_alternate_nic: bool,

    /// Azure CLI executable
    #[arg(long, env = "NICSWAP_AZ_BIN", default_value = DEFAULT_AZ_BIN)]
    az_bin: PathBuf,

    /// Azure subscription to operate in (defaults to the az CLI's current one)
    #[arg(long, env = "AZURE_SUBSCRIPTION_ID")]
    subscription: Option<String>,
}

impl Cli {
    fn policy(&self) -> Policy {
        Policy {
            start: if self.wait_for_start {
                StartWait::Wait
            } else {
                StartWait::FireAndForget
            },
            cleanup: if self.keep_alternate_nic {
                CleanupPolicy::Skip
            } else {
                CleanupPolicy::BestEffort
            },
            ..Policy::default()
        }
    }

    fn input(&self) -> SwapInput {
        SwapInput {
            original_zca: self.original_zca_ip.clone(),
            appliance: self.original_zvm_appliance_ip.clone(),
            alternate: self.alternative_zca_ip.clone(),
        }
    }

    /// Command line that undoes this run against the same subscription and az binary.
    fn revert_command(&self) -> String {
        let mut cmd = format!(
            "{BIN_NAME} --original-zca-ip {} --original-zvm-appliance-ip {} \
             --alternative-zca-ip {} --revert",
            self.original_zca_ip, self.original_zvm_appliance_ip, self.alternative_zca_ip
        );
        if self.az_bin != Path::new(DEFAULT_AZ_BIN) {
            let _ = write!(cmd, " --az-bin {}", self.az_bin.display());
        }
        if let Some(sub) = &self.subscription {
            let _ = write!(cmd, " --subscription {sub}");
        }
        cmd
    }

    fn run_mode(&self) -> RunMode {
        if self.revert {
            RunMode::Revert
        } else {
            RunMode::Apply
        }
    }

    fn apply_mode(&self) -> ApplyMode {
        if self.dry_run {
            ApplyMode::DryRun
        } else {
            ApplyMode::Commit
        }
    }
}

fn print_outcome(cli: &Cli, report: &RunReport, policy: &Policy) {
    if report.dry_run && report.succeeded() {
        println!("Dry run: {} step(s) would be performed:", report.executed.len());
        for (i, act) in report.executed.iter().enumerate() {
            println!("  {}. {act}", i + 1);
        }
        return;
    }
    if !report.succeeded() {
        return;
    }
    let Some(topo) = &report.topology else {
        return;
    };
    let addrs = &topo.addresses;
    match report.mode {
        RunMode::Apply => {
            println!(
                "ZCA VM '{}' is now reachable at {}.",
                topo.zca.vm, addrs.alternate
            );
            println!(
                "ZVM appliance VM '{}' is now reachable at {} (and still at {}).",
                topo.appliance.vm, addrs.original_zca, addrs.appliance
            );
            println!("To revert, run:\n  {}", cli.revert_command());
        }
        RunMode::Revert => {
            println!(
                "ZCA VM '{}' is reachable at {} again.",
                topo.zca.vm, addrs.original_zca
            );
            println!(
                "ZVM appliance VM '{}' is reachable at {}.",
                topo.appliance.vm, addrs.appliance
            );
        }
    }
    if !policy.start.blocks() {
        println!(
            "The VMs were started without waiting for boot; \
             allow a few minutes before connecting."
        );
    }
}

/// Exit status for a command line clap rejected: 0 for `--help`/`--version`, 1 otherwise.
fn parse_failure_code(e: &clap::Error) -> u8 {
    if e.use_stderr() {
        1
    } else {
        0
    }
}

fn exit_status(report: &RunReport) -> ExitCode {
    match u8::try_from(report.exit_code()) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(code) => ExitCode::from(code),
        Err(_) => ExitCode::FAILURE,
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(parse_failure_code(&e));
        }
    };

    let sink = StderrSink::new(cli.verbose);
    let policy = cli.policy();
    let cloud = AzCliClient::new(&cli.az_bin).with_subscription(cli.subscription.clone());
    let api = NicSwap::new(sink, sink, policy.clone(), Box::new(cloud));

    let report = api.run(&cli.input(), cli.run_mode(), cli.apply_mode());
    print_outcome(&cli, &report, &policy);
    exit_status(&report)
}
