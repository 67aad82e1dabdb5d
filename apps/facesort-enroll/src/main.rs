use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = facesort_enroll::Args::parse();
	facesort_enroll::run(args).await
}
