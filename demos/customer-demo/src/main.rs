use graft_config::provider::ConfigProvider;
use graft_customize::{CustomizeConfig, CustomizeExtension, Customizer};
use graft_di::{Container, DynError};
use modules::customers::{Customer, ExtendedCustomer, ShopSettings, Tag, Tagged};
use tracing_subscriber::EnvFilter;

mod modules;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();

    match run() {
        Ok(()) => println!("Demo ended without error"),
        Err(e) => eprintln!("Demo ended with error: {}", e),
    }
}

fn run() -> Result<(), DynError> {
    let mut config = ConfigProvider::new();
    config.add_config(CustomizeConfig {
        default_build_up: false,
    })?;

    let container = Container::new();
    container
        .add_instance(config)
        .add_instance(ShopSettings {
            currency: "EUR".into(),
        })
        .add_extension(CustomizeExtension::new())?;
    let customizer = container.inject::<Customizer>()?;

    // Initializer and capability on the declared type
    customizer
        .setup::<Customer>()
        .initialize_with(|customer| customer.first_name = "custom".into())
        .extend_with::<Tag>();

    let mut customer = container.resolve::<Customer>()?;
    customer
        .interface_mut::<dyn Tagged>()
        .ok_or("customer is not tagged")?
        .set_tag("newsletter");
    tracing::info!(
        "Resolved {} - name: {}, tag: {:?}, settings injected: {}",
        customer.instance().type_name(),
        customer.first_name,
        customer.interface::<dyn Tagged>().map(|t| t.tag().to_string()),
        customer.settings.is_some()
    );

    // Remapping after the setup is picked up by the next resolution
    container.map::<Customer, ExtendedCustomer>()?;
    customizer.setup::<Customer>().build_up(true);

    let customer = container.resolve::<Customer>()?;
    let loyalty_points = customer
        .get::<ExtendedCustomer>()
        .map(|extended| extended.loyalty_points)
        .unwrap_or_default();
    tracing::info!(
        "Resolved {} - name: {}, loyalty points: {}, currency: {:?}",
        customer.instance().type_name(),
        customer.first_name,
        loyalty_points,
        customer.settings.as_ref().map(|s| s.currency.as_str())
    );

    tracing::info!("{:?}", customizer);
    Ok(())
}
