use project_launcher::app::App;
use project_launcher::config::{self, Config};
use project_launcher::editors;
use project_launcher::logging;
use project_launcher::ui::TerminalUi;

fn main() -> anyhow::Result<()> {
    let config_path = config::config_file();
    let _log_guard = config_path.parent().and_then(logging::init);

    let discovery = editors::discover();
    let config = Config::load(&config_path);
    let mut app = App::new(discovery, config, config_path);

    // Terminal init failure is the one fatal error; anyhow prints it after
    // TerminalUi::new has already restored the terminal.
    let mut ui = TerminalUi::new()?;
    app.run(&mut ui)
}
