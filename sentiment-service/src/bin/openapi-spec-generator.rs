// Prints the OpenAPI JSON document of the service to standard output.
// `cargo forge openapi` runs this to refresh the checked-in spec.
fn main() -> anyhow::Result<()> {
    let spec = sentiment_service::build_openapi_spec().to_pretty_json()?;
    print!("{}", spec);
    Ok(())
}
