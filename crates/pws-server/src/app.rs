//! Rocket application assembly

use rocket::{Build, Rocket};

use crate::routes::{api_routes, auth_routes, root_routes};
use crate::state::ServerState;

/// Build the Rocket application over the given state
///
/// Binding (`address`, `port`) is applied by the caller through
/// [`Rocket::configure`]; tests dispatch against the result directly.
pub fn build_rocket(state: ServerState) -> Rocket<Build> {
    rocket::build()
        .manage(state)
        .mount("/auth", auth_routes())
        .mount("/api", api_routes())
        .mount("/", root_routes())
        .register("/", crate::catchers::all())
}
