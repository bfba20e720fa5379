//! Main application entry point.

fn main() {
    env_logger::init();
    log::info!("Starting Lumina");

    let args = match lumina_app::Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("lumina: {e}");
            eprintln!("{}", lumina_app::USAGE);
            std::process::exit(2);
        }
    };

    match lumina_app::run(&args) {
        Ok(session) => {
            let scene = session.editor().scene();
            log::info!(
                "Done: {} objects, {} notices",
                scene.len(),
                session.notices().len()
            );
        }
        Err(e) => {
            log::error!("{e}");
            eprintln!("lumina: {e}");
            std::process::exit(1);
        }
    }
}
