//! Placeholder app modules hosted by every catalog entry.
//!
//! The shell only needs each app to mount, react to its menus and report lifecycle hooks; the
//! views here show which command arrived last and exercise the dialog service for the menu items
//! that open one.

use desktop_app_contract::{
    AppCommand, AppId, AppMenuEvent, AppModule, AppMountContext, MenuCommand, WindowService,
};
use leptos::*;

use crate::dialog::{DialogManager, InfoRow};

pub(super) fn module_for(app_id: AppId) -> AppModule {
    let module = AppModule::new(mount_placeholder_app)
        .with_init(log_window_ready)
        .with_close(log_window_closed);
    match app_id {
        AppId::Portfolio => module.with_menu_handler(portfolio_menu),
        AppId::Notepad => module.with_menu_handler(notepad_menu),
        AppId::Explorer => module.with_menu_handler(explorer_menu),
        AppId::Browser => module.with_menu_handler(browser_menu),
        AppId::Paint => module.with_menu_handler(paint_menu),
        AppId::Mines => module.with_menu_handler(mines_menu),
        _ => module,
    }
}

fn mount_placeholder_app(context: AppMountContext) -> View {
    view! { <PlaceholderApp context=context /> }.into_view()
}

fn log_window_ready(window_id: &str) {
    logging::log!("app window `{window_id}` initialised");
}

fn log_window_closed(window_id: &str) {
    logging::log!("app window `{window_id}` closed");
}

fn portfolio_menu(event: &AppMenuEvent) -> Result<Vec<AppCommand>, String> {
    Ok(match event.command {
        MenuCommand::OpenReadme => vec![AppCommand::OpenApp {
            app_id: AppId::Readme,
        }],
        MenuCommand::OpenContact => vec![AppCommand::OpenApp {
            app_id: AppId::Contact,
        }],
        _ => Vec::new(),
    })
}

fn notepad_menu(event: &AppMenuEvent) -> Result<Vec<AppCommand>, String> {
    Ok(match event.command {
        MenuCommand::New => vec![AppCommand::SetWindowTitle {
            title: "Notepad - Untitled".to_string(),
        }],
        _ => Vec::new(),
    })
}

fn explorer_menu(event: &AppMenuEvent) -> Result<Vec<AppCommand>, String> {
    Ok(match event.command {
        cmd @ (MenuCommand::ViewLarge
        | MenuCommand::ViewSmall
        | MenuCommand::ViewList
        | MenuCommand::ViewDetails) => vec![AppCommand::SetMenuChecked {
            menu: event.menu.clone(),
            commands: vec![cmd],
            exclusive: true,
        }],
        MenuCommand::ShowHidden => vec![AppCommand::SetMenuChecked {
            menu: event.menu.clone(),
            commands: vec![MenuCommand::ShowHidden],
            exclusive: false,
        }],
        _ => Vec::new(),
    })
}

fn browser_menu(event: &AppMenuEvent) -> Result<Vec<AppCommand>, String> {
    let site = match event.command {
        MenuCommand::GoWiki => "Wikipedia",
        MenuCommand::GoGoogle => "Google",
        MenuCommand::GoGitHub => "GitHub",
        _ => return Ok(Vec::new()),
    };
    Ok(vec![AppCommand::SetWindowTitle {
        title: format!("Internet Explorer - {site}"),
    }])
}

fn paint_menu(event: &AppMenuEvent) -> Result<Vec<AppCommand>, String> {
    Ok(match event.command {
        cmd @ (MenuCommand::ToggleToolbar | MenuCommand::ToggleColors | MenuCommand::ToggleStatus) => {
            vec![AppCommand::SetMenuChecked {
                menu: event.menu.clone(),
                commands: vec![cmd],
                exclusive: false,
            }]
        }
        _ => Vec::new(),
    })
}

fn mines_menu(event: &AppMenuEvent) -> Result<Vec<AppCommand>, String> {
    Ok(match event.command {
        cmd @ (MenuCommand::Beginner | MenuCommand::Intermediate | MenuCommand::Expert) => {
            vec![AppCommand::SetMenuChecked {
                menu: event.menu.clone(),
                commands: vec![cmd],
                exclusive: true,
            }]
        }
        _ => Vec::new(),
    })
}

fn blurb(app_id: AppId) -> &'static str {
    match app_id {
        AppId::Portfolio => "Projects, experience and skills.",
        AppId::Readme => "Welcome! Double-click an icon to open an application.",
        AppId::Contact => "Send a message. Mail delivery is not wired up in this build.",
        AppId::Notepad => "A plain text editor.",
        AppId::Terminal => "A command prompt.",
        AppId::Explorer => "Browse the portfolio file system.",
        AppId::Browser => "A period-appropriate web browser.",
        AppId::SimpleMode => "The portfolio as a single plain page.",
        AppId::Paint => "A pixel canvas.",
        AppId::Calc => "A four-function calculator.",
        AppId::Tunes => "A tiny synthesizer keyboard.",
        AppId::Mines => "Clear the field without hitting a mine.",
        AppId::Snake => "Eat, grow, avoid your tail.",
        AppId::Tetris => "Stack the falling blocks.",
        AppId::SysInfo => "System information.",
        AppId::TaskMgr => "Running applications.",
        AppId::Control => "Desktop settings.",
    }
}

fn how_to_play(app_id: AppId) -> &'static str {
    match app_id {
        AppId::Mines => "Left-click to reveal a square, right-click to flag a mine.",
        AppId::Snake => "Use the arrow keys to steer. Eating food makes the snake longer.",
        AppId::Tetris => "Arrow keys move and rotate. Complete rows to clear them.",
        _ => "No instructions available.",
    }
}

/// Runs the dialog flow some menu commands open. Returns `true` when one was started.
fn run_menu_dialog(
    dialogs: DialogManager,
    window: WindowService,
    context: &AppMountContext,
    command: MenuCommand,
    status: RwSignal<String>,
) -> bool {
    let app_id = context.app_id;
    let window_id = context.window_id.clone();
    match command {
        MenuCommand::HowToPlay => {
            spawn_local(async move {
                dialogs.alert("How to Play", how_to_play(app_id)).await;
            });
        }
        MenuCommand::BestTimes => {
            spawn_local(async move {
                dialogs.alert("Best Times", "No times recorded yet.").await;
            });
        }
        MenuCommand::ClearCanvas => {
            spawn_local(async move {
                if dialogs.confirm("Paint", "Clear the entire canvas?").await {
                    status.set("Canvas cleared".to_string());
                }
            });
        }
        MenuCommand::NewFolder => {
            spawn_local(async move {
                if let Some(name) = dialogs.prompt("New Folder", "Folder name:", "New Folder").await {
                    status.set(format!("Created folder `{name}`"));
                }
            });
        }
        MenuCommand::Properties => {
            spawn_local(async move {
                dialogs
                    .info(
                        "Properties",
                        vec![
                            InfoRow::new("Window", window_id),
                            InfoRow::new("Application", app_id.as_str()),
                        ],
                    )
                    .await;
            });
        }
        MenuCommand::OpenUrl => {
            spawn_local(async move {
                if let Some(url) = dialogs.prompt("Open", "Address:", "https://").await {
                    window.set_title(format!("Internet Explorer - {url}"));
                }
            });
        }
        _ => return false,
    }
    true
}

#[component]
fn PlaceholderApp(context: AppMountContext) -> impl IntoView {
    let status = create_rw_signal("Ready".to_string());
    let dialogs = use_context::<DialogManager>();
    let inbox = context.inbox;
    let window = context.window;
    let app_id = context.app_id;

    {
        let context = context.clone();
        create_effect(move |_| {
            let events = inbox.get();
            if events.is_empty() {
                return;
            }
            inbox.set(Vec::new());
            for event in events {
                let started = dialogs
                    .map(|dialogs| run_menu_dialog(dialogs, window, &context, event.command, status))
                    .unwrap_or(false);
                if !started {
                    status.set(format!("{} > {}", event.menu, event.command));
                }
            }
        });
    }

    view! {
        <div class="app-shell app-placeholder" data-app=app_id.as_str()>
            <p class="app-placeholder-blurb">{blurb(app_id)}</p>
            <div class="app-statusbar">
                <span>{move || status.get()}</span>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn event(menu: &str, command: MenuCommand) -> AppMenuEvent {
        AppMenuEvent {
            window_id: "test".to_string(),
            menu: menu.to_string(),
            command,
        }
    }

    #[test]
    fn mines_difficulty_is_a_radio_group() {
        let commands = module_for(AppId::Mines)
            .handle_menu(&event("Game", MenuCommand::Expert))
            .expect("handled");
        assert_eq!(
            commands,
            vec![AppCommand::SetMenuChecked {
                menu: "Game".to_string(),
                commands: vec![MenuCommand::Expert],
                exclusive: true,
            }]
        );
    }

    #[test]
    fn explorer_hidden_files_toggle_flips_one_item() {
        let commands = module_for(AppId::Explorer)
            .handle_menu(&event("View", MenuCommand::ShowHidden))
            .expect("handled");
        assert_eq!(
            commands,
            vec![AppCommand::SetMenuChecked {
                menu: "View".to_string(),
                commands: vec![MenuCommand::ShowHidden],
                exclusive: false,
            }]
        );
    }

    #[test]
    fn portfolio_links_open_other_apps() {
        let module = module_for(AppId::Portfolio);
        assert_eq!(
            module.handle_menu(&event("File", MenuCommand::OpenContact)),
            Ok(vec![AppCommand::OpenApp {
                app_id: AppId::Contact
            }])
        );
        assert_eq!(module.handle_menu(&event("File", MenuCommand::Print)), Ok(Vec::new()));
    }

    #[test]
    fn browser_favorites_retitle_the_window() {
        assert_eq!(
            module_for(AppId::Browser).handle_menu(&event("Favorites", MenuCommand::GoGitHub)),
            Ok(vec![AppCommand::SetWindowTitle {
                title: "Internet Explorer - GitHub".to_string()
            }])
        );
    }

    #[test]
    fn apps_without_handlers_request_nothing() {
        assert_eq!(
            module_for(AppId::Snake).handle_menu(&event("Game", MenuCommand::Pause)),
            Ok(Vec::new())
        );
    }
}
