use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = caselens_api::Args::parse();

	caselens_api::run(args).await
}
