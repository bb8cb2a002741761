use env_logger::{Builder, Env};
use log::error;

fn main() {
    // RUST_LOG=debug покажет размещение каждой записи (страница, слот, сколько страниц просмотрено)
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    if let Err(e) = heapdb::cli::run() {
        error!("heapdb: {:?}", e);
        std::process::exit(1);
    }
}
