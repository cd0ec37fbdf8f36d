use std::path::PathBuf;

use sevlog::logger_config;

fn main() {
    let dir = PathBuf::from("/tmp/sevlog_example");
    let _ = std::fs::remove_dir_all(&dir);

    let guard = logger_config()
        .with_log_dir(&dir)
        .init_global()
        .expect("Unable to set up log files");

    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                log::info!("worker {i} started");
                if i % 2 == 1 {
                    log::warn!("worker {i} is running late");
                }
                log::error!("worker {i} lost its connection");
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for name in ["info.log", "warn.log", "error.log", "fatal.log"] {
        let content = std::fs::read_to_string(dir.join(name)).unwrap();
        println!("{name}: {} lines", content.lines().count());
    }

    if std::env::args().any(|arg| arg == "--fatal") {
        sevlog::fatal!("giving up after the demo");
    }
    drop(guard);
}
