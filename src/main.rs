// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! nettap CLI
//!
//! Sends a request through the capture pipeline and prints the records.

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use nettap::{
    CaptureConfig, CaptureInterceptor, HttpClient, MemoryStore, Pipeline, Request,
};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("nettap=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    match args[1].as_str() {
        "fetch" => {
            if args.len() < 3 {
                eprintln!("Usage: nettap fetch <url>");
                return ExitCode::from(1);
            }
            match fetch_url(&args[2]).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    ExitCode::from(1)
                }
            }
        }
        "--help" | "-h" | "help" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "--version" | "-v" | "version" => {
            println!("nettap {}", nettap::VERSION);
            ExitCode::SUCCESS
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"nettap - HTTP exchange capture

USAGE:
    nettap <COMMAND> [OPTIONS]

COMMANDS:
    fetch <url>     GET a URL through the capture pipeline and print the records
    help            Show this help message
    version         Show version information

ENVIRONMENT:
    NETTAP_CAPTURE_ENABLED    Capture on/off (default on)
    NETTAP_RESOLVE_DNS        Resolve the host to an IP (default on)
    NETTAP_DNS_TIMEOUT_MS     Bound on that lookup
    RUST_LOG                  Log filter (default nettap=info)

EXAMPLES:
    nettap fetch https://example.com
    NETTAP_DNS_TIMEOUT_MS=500 nettap fetch http://localhost:8080/health
"#
    );
}

async fn fetch_url(url: &str) -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let capture = CaptureInterceptor::from_config(&CaptureConfig::from_env())
        .store(store.clone())
        .sink(store.clone());
    let pipeline = Pipeline::new(HttpClient::new()?).with(capture);

    let request = Request::get(url).with_context(|| format!("invalid URL: {}", url))?;
    let result = pipeline.execute(request).await;

    // Records are printed for failed exchanges too
    for record in store.records() {
        println!("{}", serde_json::to_string_pretty(&record)?);
    }

    let response = result.with_context(|| format!("failed to fetch {}", url))?;
    let body = response.body.into_bytes().await?;
    println!("\n=== Response ===");
    println!("Status: {}", response.status);
    println!("Size: {} bytes", body.len());

    Ok(())
}
