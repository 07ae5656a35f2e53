use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = caselens_ingest::Args::parse();

	caselens_ingest::run(args).await
}
