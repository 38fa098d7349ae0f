//! Print the OpenAPI document as YAML.

use coplate::ApiDoc;
use utoipa::OpenApi;

fn main() {
    match ApiDoc::openapi().to_yaml() {
        Ok(yaml) => println!("{yaml}"),
        Err(err) => {
            eprintln!("failed to serialise OpenAPI document: {err}");
            std::process::exit(1);
        }
    }
}
