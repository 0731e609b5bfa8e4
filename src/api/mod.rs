use rocket::Route;

pub mod auth;
pub mod sorting;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(auth::routes());
    routes.extend(sorting::routes());
    routes
}
