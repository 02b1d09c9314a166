/// Loads an editor configuration and prints the resulting label classes and
/// attribute handlers.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use hvat_attributes::EditorConfig;

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("Usage: hvat-attributes <config.json>");
        std::process::exit(2);
    };

    let config = match EditorConfig::load(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .parse_default_env()
        .init();

    let catalog = match config.build_catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    for entry in catalog.classes() {
        println!("{}", entry.name());
        for attribute in entry.attributes() {
            match catalog.handler(attribute) {
                Some(handler) if entry.is_editable(attribute) => {
                    let view = handler.borrow().view();
                    let choices: Vec<String> = view
                        .choices
                        .iter()
                        .map(|choice| match choice.shortcuts.as_slice() {
                            [] => choice.value.to_string(),
                            keys => format!("{} [{}]", choice.value, keys.join(", ")),
                        })
                        .collect();
                    let field = view
                        .field
                        .map(|field| format!(" <{}>", field.kind))
                        .unwrap_or_default();
                    println!("  {}: {}{}", attribute, choices.join(" | "), field);
                }
                _ => {
                    let prototype = entry.prototype().borrow();
                    let value = prototype
                        .get(attribute)
                        .map(ToString::to_string)
                        .unwrap_or_default();
                    println!("  {} = {}", attribute, value);
                }
            }
        }
    }
}

// There is no command line on wasm32; the library is used directly.
#[cfg(target_arch = "wasm32")]
fn main() {}
