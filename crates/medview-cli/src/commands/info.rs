use colored::Colorize;
use medview_core::EndpointConfig;

pub fn config(cfg: &EndpointConfig) {
    println!("{}: {}", "Base URL".cyan(), cfg.base_url());
    println!("{}: {}", "Endpoint".cyan(), cfg.endpoint());
    println!("{}: {}s", "Timeout".cyan(), cfg.timeout().as_secs_f64());
    println!(
        "{}: {}",
        "TLS verify".cyan(),
        if cfg.verify_tls() {
            "on".green()
        } else {
            "off".yellow()
        }
    );
    match cfg.credentials() {
        Some(creds) => println!("{}: Basic (user: {}, password: ***)", "Auth".cyan(), creds.username),
        None => println!("{}: (none)", "Auth".cyan()),
    }
}

pub fn about(cfg: &EndpointConfig) {
    println!("{}", "Patient Profile Viewer".bold());
    println!("Medical System API Client");
    println!("{}: {}", "Version".cyan(), env!("CARGO_PKG_VERSION"));
    println!("Fetches patient data from ORDS API");
    println!("{}: {}", "API Endpoint".cyan(), cfg.endpoint());
}
