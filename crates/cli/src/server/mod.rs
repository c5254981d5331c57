mod dns;
mod signals;

pub use dns::start_dns_server;
pub use signals::spawn_signal_handlers;
