use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = facesort_api::Args::parse();
    facesort_api::run(args).await
}
