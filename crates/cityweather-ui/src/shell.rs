//! Interactive shell: tabs, per-tab history and the command language.

use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use cityweather_catalog::{FilterOption, SortDirection, SortField};
use thiserror::Error;

use crate::app_services::AppServices;
use crate::models::{CityBrowserModel, WeatherModel};
use crate::navigation::{Clipboard, Navigation, OpenTarget};
use crate::render::{CitiesView, TabBar, WeatherView};
use crate::route::{Route, RouteError};

pub const HELP: &str = "\
Commands (rows, suggestions, menu items and tabs are numbered from 1):
  more                 load the next page
  scroll <row>         make <row> the lowest visible row
  search <text>        set the search query (empty clears it)
  pick <n>             accept search suggestion <n>
  filter <option|none> order the list, e.g. asc_name, desc_timezone
  sort <asc|desc|none> direction for the next header sort
  header <column>      sort by name, country or timezone
  open <row>           show weather for the city in <row>
  menu <row>           open the context menu for <row>
  highlight <n>        highlight context menu item <n>
  choose <n>           choose context menu item <n>
  close                dismiss the context menu
  goto <route>         navigate, e.g. / or /weather/Paris
  back                 previous route in this tab
  tabs                 list tabs
  tab <n>              switch to tab <n>
  reload               reload the city list from page 1
  quit                 exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    More,
    Scroll(usize),
    Search(String),
    Pick(usize),
    Filter(Option<FilterOption>),
    Sort(Option<SortDirection>),
    Header(SortField),
    Open(usize),
    Menu(usize),
    Highlight(usize),
    Choose(usize),
    Close,
    Goto(Route),
    Back,
    Tabs,
    Tab(usize),
    Reload,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("Invalid argument for '{command}': {message}")]
    InvalidArgument {
        command: &'static str,
        message: String,
    },
    #[error(transparent)]
    Route(#[from] RouteError),
}

impl FromStr for Command {
    type Err = CommandError;

    /// Parse one input line. Numeric arguments are 1-based and stored 0-based.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, arg) = match line.split_once(char::is_whitespace) {
            Some((w, a)) => (w, a.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "help" | "?" => Command::Help,
            "more" => Command::More,
            "scroll" => Command::Scroll(index("scroll", arg)?),
            "search" => Command::Search(arg.to_string()),
            "pick" => Command::Pick(index("pick", arg)?),
            "filter" => Command::Filter(optional("filter", arg)?),
            "sort" => Command::Sort(optional("sort", arg)?),
            "header" => Command::Header(required("header", arg)?),
            "open" => Command::Open(index("open", arg)?),
            "menu" => Command::Menu(index("menu", arg)?),
            "highlight" => Command::Highlight(index("highlight", arg)?),
            "choose" => Command::Choose(index("choose", arg)?),
            "close" => Command::Close,
            "goto" => {
                if arg.is_empty() {
                    return Err(CommandError::MissingArgument("goto"));
                }
                Command::Goto(Route::parse(arg)?)
            }
            "back" => Command::Back,
            "tabs" => Command::Tabs,
            "tab" => Command::Tab(index("tab", arg)?),
            "reload" => Command::Reload,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

fn index(command: &'static str, arg: &str) -> Result<usize, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingArgument(command));
    }
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(CommandError::InvalidArgument {
            command,
            message: format!("expected a number from 1, got '{arg}'"),
        }),
    }
}

fn required<T: FromStr<Err = String>>(
    command: &'static str,
    arg: &str,
) -> Result<T, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingArgument(command));
    }
    arg.parse()
        .map_err(|message| CommandError::InvalidArgument { command, message })
}

fn optional<T: FromStr<Err = String>>(
    command: &'static str,
    arg: &str,
) -> Result<Option<T>, CommandError> {
    if arg.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    required(command, arg).map(Some)
}

/// What a tab currently shows.
pub enum Screen {
    Cities(CityBrowserModel),
    Weather(WeatherModel),
}

impl Screen {
    fn mount(services: &Arc<AppServices>, route: &Route) -> Self {
        let mut screen = match route {
            Route::Cities => Screen::Cities(CityBrowserModel::new(services.clone())),
            Route::Weather { city } => {
                Screen::Weather(WeatherModel::new(services.clone(), city.clone()))
            }
        };
        match &mut screen {
            Screen::Cities(model) => model.mount(),
            Screen::Weather(model) => model.mount(),
        }
        screen
    }

    fn poll(&mut self) -> bool {
        match self {
            Screen::Cities(model) => model.poll_channel(),
            Screen::Weather(model) => model.poll_channel(),
        }
    }

    fn is_loading(&self) -> bool {
        match self {
            Screen::Cities(model) => model.is_loading(),
            Screen::Weather(model) => model.is_loading(),
        }
    }
}

struct Tab {
    history: Vec<Route>,
    screen: Screen,
}

impl Tab {
    fn open(services: &Arc<AppServices>, route: Route) -> Self {
        let screen = Screen::mount(services, &route);
        Self {
            history: vec![route],
            screen,
        }
    }

    fn route(&self) -> &Route {
        // history is never empty
        &self.history[self.history.len() - 1]
    }

    /// Replace the screen; the old one is torn down when dropped.
    fn navigate(&mut self, services: &Arc<AppServices>, route: Route) {
        self.screen = Screen::mount(services, &route);
        self.history.push(route);
    }

    fn back(&mut self, services: &Arc<AppServices>) -> bool {
        if self.history.len() < 2 {
            return false;
        }
        self.history.pop();
        let route = self.route().clone();
        self.screen = Screen::mount(services, &route);
        true
    }
}

pub struct Shell {
    services: Arc<AppServices>,
    tabs: Vec<Tab>,
    active: usize,
    clipboard: Box<dyn Clipboard>,
    status: Option<String>,
}

impl Shell {
    pub fn new(services: Arc<AppServices>, initial: Route, clipboard: Box<dyn Clipboard>) -> Self {
        tracing::info!(route = %initial, "Opening first tab");
        let tab = Tab::open(&services, initial);
        Self {
            services,
            tabs: vec![tab],
            active: 0,
            clipboard,
            status: None,
        }
    }

    pub fn active_route(&self) -> &Route {
        self.tabs[self.active].route()
    }

    pub fn active_screen(&self) -> &Screen {
        &self.tabs[self.active].screen
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn active_tab(&self) -> usize {
        self.active
    }

    /// Message from the last command, if it produced one
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Run one command. Returns false once the shell should exit.
    pub fn execute(&mut self, command: Command) -> bool {
        self.status = None;
        tracing::debug!(?command, "Executing command");

        match command {
            Command::Quit => return false,
            Command::Help => self.status = Some(HELP.to_string()),
            Command::Tabs => self.status = Some(self.tab_listing()),
            Command::Tab(index) => {
                if index < self.tabs.len() {
                    self.active = index;
                } else {
                    self.status = Some(format!("No tab {}", index + 1));
                }
            }
            Command::Goto(route) => self.navigate(Navigation::Open {
                route,
                target: OpenTarget::Parent,
            }),
            Command::Back => {
                let services = self.services.clone();
                if !self.tabs[self.active].back(&services) {
                    self.status = Some("No earlier page in this tab".to_string());
                }
            }
            other => self.execute_on_cities(other),
        }
        true
    }

    fn execute_on_cities(&mut self, command: Command) {
        let Screen::Cities(model) = &mut self.tabs[self.active].screen else {
            self.status = Some("That command only works on the city list".to_string());
            return;
        };

        let mut navigation = None;
        match command {
            Command::More => {
                if !model.load_more() {
                    self.status = Some("Nothing more to load right now".to_string());
                }
            }
            Command::Scroll(row) => model.scroll_to(row),
            Command::Search(text) => model.set_query(&text),
            Command::Pick(index) => {
                if model.pick_suggestion(index).is_none() {
                    self.status = Some(format!("No suggestion {}", index + 1));
                }
            }
            Command::Filter(option) => model.set_filter(option),
            Command::Sort(option) => model.set_sort_option(option),
            Command::Header(field) => model.handle_sort(field),
            Command::Reload => model.reload(),
            Command::Open(row) => match model.select_city(row) {
                Some(nav) => navigation = Some(nav),
                None => self.status = Some(format!("No row {}", row + 1)),
            },
            Command::Menu(row) => {
                if !model.open_menu(row) {
                    self.status = Some(format!("No row {}", row + 1));
                }
            }
            Command::Highlight(index) => {
                if !model.menu().is_open() {
                    self.status = Some("No menu is open".to_string());
                } else if !model.highlight_menu_item(index) {
                    self.status = Some(format!("No menu item {}", index + 1));
                }
            }
            Command::Choose(index) => {
                if !model.menu().is_open() {
                    self.status = Some("No menu is open".to_string());
                } else {
                    navigation = model.choose_menu_item(index);
                }
            }
            Command::Close => model.close_menu(),
            Command::Help
            | Command::Goto(_)
            | Command::Back
            | Command::Tabs
            | Command::Tab(_)
            | Command::Quit => {}
        }

        if let Some(nav) = navigation {
            self.navigate(nav);
        }
    }

    /// Carry out a navigation request from a screen.
    pub fn navigate(&mut self, navigation: Navigation) {
        match navigation {
            Navigation::Open { route, target } => {
                tracing::info!(route = %route, ?target, "Navigating");
                let services = self.services.clone();
                match target {
                    OpenTarget::Parent => self.tabs[self.active].navigate(&services, route),
                    OpenTarget::NewTab => {
                        self.tabs.push(Tab::open(&services, route));
                        self.status = Some(format!("Opened tab {}", self.tabs.len()));
                    }
                    OpenTarget::NewWindow => {
                        self.tabs.push(Tab::open(&services, route));
                        self.active = self.tabs.len() - 1;
                    }
                }
            }
            Navigation::CopyLink(link) => match self.clipboard.set_text(&link) {
                Ok(()) => self.status = Some(format!("Copied {link}")),
                Err(e) => {
                    tracing::warn!("Clipboard write failed: {}", e);
                    self.status = Some("Could not copy link".to_string());
                }
            },
        }
    }

    /// Apply finished fetches on every tab. Returns true when anything changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        for tab in &mut self.tabs {
            changed |= tab.screen.poll();
        }
        changed
    }

    /// Some tab still waits on a fetch.
    pub fn is_busy(&self) -> bool {
        self.tabs.iter().any(|t| t.screen.is_loading())
    }

    /// Poll until nothing is in flight or `timeout` passes.
    pub fn settle(&mut self, timeout: Duration) {
        let deadline = Instant::now() + timeout;
        loop {
            self.poll();
            if !self.is_busy() || Instant::now() >= deadline {
                break;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
    }

    fn tab_listing(&self) -> String {
        self.tabs
            .iter()
            .enumerate()
            .map(|(i, tab)| {
                let marker = if i == self.active { '*' } else { ' ' };
                format!("{marker}{}  {}", i + 1, tab.route())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Full screen text for the active tab.
    pub fn render(&self) -> String {
        let titles: Vec<String> = self.tabs.iter().map(|t| t.route().title()).collect();
        let mut out = TabBar {
            titles: &titles,
            active: self.active,
        }
        .to_string();
        out.push('\n');
        out.push_str(&format!("Location: {}\n\n", self.active_route()));

        let body = match &self.tabs[self.active].screen {
            Screen::Cities(model) => CitiesView {
                model,
                visible_rows: self.services.config().ui.visible_rows,
            }
            .to_string(),
            Screen::Weather(model) => WeatherView { model }.to_string(),
        };
        out.push_str(&body);

        if let Some(status) = &self.status {
            out.push_str("\n\n");
            out.push_str(status);
        }
        out
    }

    /// Tear down every screen.
    pub fn close(&mut self) {
        for tab in &mut self.tabs {
            match &mut tab.screen {
                Screen::Cities(model) => model.teardown(),
                Screen::Weather(model) => model.teardown(),
            }
        }
    }
}
