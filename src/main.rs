use asn_cidr_summary::config::Settings;
use asn_cidr_summary::run;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    log4rs::init_file("log4rs.yml", Default::default()).expect("Error initializing log4rs");
    dotenv::dotenv().ok();
    //
    log::info!("#Start main()");

    let settings = Settings::from_env()?.with_isps(std::env::args().skip(1));
    log::debug!("{settings:?}");

    let summary = run(&settings).await?;
    log::info!(
        "#End main() {} IPv4 + {} IPv6 prefixes, {} tokens skipped",
        summary.result.ipv4.len(),
        summary.result.ipv6.len(),
        summary.skipped.len()
    );

    Ok(())
}
