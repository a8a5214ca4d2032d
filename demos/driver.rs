use std::sync::Arc;

use simple_env_flags::{Client, EnvProvider, EvaluationContext, ProviderSettings};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), simple_env_flags::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Optional settings file as the first argument.
    let path = std::env::args().nth(1);
    let settings = ProviderSettings::load(path.as_deref().map(std::path::Path::new))?;
    let client = Client::new("my-app", Arc::new(EnvProvider::from_settings(&settings)));

    let prefix = &settings.prefix;
    std::env::set_var(format!("{prefix}MY_FEATURE"), "true");
    std::env::set_var(format!("{prefix}COUNT"), "42");
    std::env::set_var(format!("{prefix}NAME"), "test");

    let ctx = EvaluationContext::new().with_targeting_key("user-123");
    println!(
        "{} {} {}",
        client.bool_value("my_feature", false, Some(&ctx)),
        client.int_value("count", 0, Some(&ctx)),
        client.string_value("name", "", Some(&ctx)),
    );

    let ctx = ctx
        .with_attribute("my_feature", true)
        .with_attribute("count", 1000);
    println!(
        "{} {} {}",
        client.bool_value("my_feature", false, Some(&ctx)),
        client.int_value("count", 0, Some(&ctx)),
        client.string_value("name", "", Some(&ctx)),
    );

    let details = client.int_details("count", 0, Some(&ctx.with_attribute("count", "abc")));
    println!(
        "{} = {} ({}{})",
        details.flag_key,
        details.value,
        details.reason,
        details
            .error
            .map(|e| format!(", {e}"))
            .unwrap_or_default()
    );

    Ok(())
}
