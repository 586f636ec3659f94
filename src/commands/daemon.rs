use crate::core::{
    daemon::{DaemonConfig, DaemonHandle},
    error::{PreloadError, Result},
    print_info,
};
use crossbeam_channel::bounded;

/// Run the refresh daemon in the foreground until Ctrl-C.
pub fn execute_daemon(config: DaemonConfig) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.try_send(());
    })
    .map_err(|e| PreloadError::SignalHandler {
        message: e.to_string(),
    })?;

    let period = config.refresh_period;
    let handle = DaemonHandle::new(config);
    handle.start()?;
    print_info(&format!(
        "Preload daemon running every {}s. Press Ctrl-C to stop.",
        period.as_secs()
    ));

    let _ = shutdown_rx.recv();
    handle.stop()
}
