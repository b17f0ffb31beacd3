use proinsight::config::AppConfig;
use proinsight::{App, init_logging};

fn main() {
	init_logging(AppConfig::from_build_env().log_level);
	leptos::mount::mount_to_body(App);
}
