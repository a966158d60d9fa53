//! Shared CLI plumbing: rayon pool configuration and result printing.

use nearfermat::Witness;
use tracing::{info, warn};

/// Configure the rayon global thread pool with optional QoS and thread count.
pub fn configure_rayon(threads: Option<usize>, qos: bool) {
    let num_threads = threads.unwrap_or(0);

    #[cfg(target_os = "macos")]
    if qos {
        let result = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .spawn_handler(|thread| {
                std::thread::Builder::new().spawn(move || {
                    // SAFETY: pthread_set_qos_class_self_np is a well-defined macOS API
                    // that sets the QoS class for the current thread. No memory safety concerns.
                    unsafe {
                        libc::pthread_set_qos_class_self_np(
                            libc::qos_class_t::QOS_CLASS_USER_INITIATED,
                            0,
                        );
                    }
                    thread.run();
                })?;
                Ok(())
            })
            .build_global();

        match result {
            Ok(()) => {
                info!("Rayon threads configured with macOS QoS: user-initiated (P-core scheduling)");
            }
            Err(e) => {
                warn!(error = %e, "Could not configure rayon thread pool");
            }
        }
        return;
    }

    #[cfg(not(target_os = "macos"))]
    if qos {
        warn!("--qos flag is only effective on macOS, ignoring");
    }

    if num_threads > 0 {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
        {
            warn!(error = %e, "Could not configure rayon thread pool");
        }
    }
}

/// The authoritative result line on stdout: the witness in decimal, or a
/// clear exhaustion notice. With `json`, the witness goes out as one JSON
/// object instead.
pub fn report_outcome(outcome: Option<Witness>, json: bool) -> anyhow::Result<()> {
    match outcome {
        Some(witness) => {
            info!(witness = %witness, "solution found");
            if json {
                println!("{}", serde_json::to_string(&witness)?);
            } else {
                println!("Solution found: {}", witness);
            }
        }
        None => {
            if json {
                println!("null");
            } else {
                println!("No solution found in the searched range.");
            }
        }
    }
    Ok(())
}
