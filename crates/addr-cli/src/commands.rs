use addr_cli::batch::{process_table, progress_bar, read_table, write_table};
use addr_core::{
    AddressService, ErrorMode, InternationalConfig, ParseOptions, ServiceConfig, TableOptions,
    TableRoute,
};
use addr_model::ParseOutcome;
use anyhow::{Context, Result};
use tracing::{debug, info_span};

use crate::cli::{AuditArgs, BatchArgs, ErrorModeArg, ParseArgs, ServiceArgs, ZipArgs};
use crate::summary::{print_audit, print_batch_report, print_outcomes, print_zips};

/// Environment configuration with command-line flags applied on top.
pub fn service_config(args: &ServiceArgs) -> Result<ServiceConfig> {
    let mut config = ServiceConfig::from_env().context("read ADDRKIT_* environment")?;
    if let Some(path) = &args.dataset {
        config = config.with_dataset_path(path.clone());
    }
    if args.check_state_match {
        config = config.with_check_state_match(true);
    }
    if let Some(url) = &args.libpostal_url {
        let international = match config.international.take() {
            Some(existing) => InternationalConfig {
                base_url: url.clone(),
                ..existing
            },
            None => InternationalConfig::new(url.clone()),
        };
        config = config.with_international(international);
    }
    if let Some(secs) = args.timeout_secs {
        if let Some(international) = config.international.take() {
            config = config.with_international(international.with_timeout_secs(secs));
        }
    }
    Ok(config)
}

pub fn build_service(args: &ServiceArgs) -> Result<AddressService> {
    let config = service_config(args)?;
    AddressService::from_config(&config).context("start address service")
}

/// Returns true when every input produced a valid result.
pub fn run_parse(service: &AddressService, args: &ParseArgs) -> Result<bool> {
    let options = if args.no_validate {
        ParseOptions::without_validation()
    } else {
        service.default_options()
    };
    let mut outcomes = Vec::with_capacity(args.addresses.len());
    for address in &args.addresses {
        outcomes.push(parse_one(service, address, args.auto, options)?);
    }

    if args.json {
        for outcome in &outcomes {
            println!("{}", serde_json::to_string(&outcome.view())?);
        }
    } else {
        print_outcomes(&outcomes);
    }
    Ok(outcomes.iter().all(ParseOutcome::is_valid))
}

pub fn run_audit(service: &AddressService, args: &AuditArgs) -> Result<bool> {
    let outcome = parse_one(service, &args.address, args.auto, service.default_options())?;
    let rows = outcome.aggregate();
    if args.json {
        let document = serde_json::json!({
            "outcome": outcome.view(),
            "audit": rows,
        });
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        print_audit(&outcome, &rows);
    }
    Ok(outcome.is_valid())
}

/// Returns true when every ZIP was found.
pub fn run_zip(service: &AddressService, args: &ZipArgs) -> Result<bool> {
    let mut results = Vec::with_capacity(args.zips.len());
    for zip in &args.zips {
        let info = service
            .lookup_zip(zip)
            .with_context(|| format!("look up {zip}"))?;
        results.push((zip.clone(), info));
    }
    print_zips(&results);
    Ok(results.iter().all(|(_, info)| info.is_some()))
}

/// Returns true when no non-blank row failed to parse.
pub fn run_batch(service: &AddressService, args: &BatchArgs) -> Result<bool> {
    let span = info_span!("batch", input = %args.input.display(), column = %args.column);
    let _guard = span.enter();

    let df = read_table(&args.input)?;
    let options = TableOptions::default()
        .with_prefix(args.prefix.clone())
        .with_errors(match args.errors {
            ErrorModeArg::Coerce => ErrorMode::Coerce,
            ErrorModeArg::Raise => ErrorMode::Raise,
        })
        .with_route(if args.auto {
            TableRoute::Auto
        } else {
            TableRoute::Domestic
        });

    let progress = progress_bar(df.height());
    let (mut result, report) = process_table(service, &df, &args.column, &options, &progress)
        .with_context(|| format!("parse column `{}`", args.column))?;
    write_table(&mut result, args.output.as_deref())?;
    print_batch_report(&report);
    Ok(report.failed == 0)
}

fn parse_one(
    service: &AddressService,
    address: &str,
    auto: bool,
    options: ParseOptions,
) -> Result<ParseOutcome> {
    if auto {
        let (outcome, trace) = service.parse_auto_traced(address)?;
        debug!(route = %trace, source = %outcome.source(), "routed address");
        Ok(outcome)
    } else {
        Ok(service.parse(address, options)?)
    }
}
