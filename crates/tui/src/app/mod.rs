use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyEvent};

use api_types::{device::DeviceRegister, expense::ExpenseNew};
use engine::{Expense, Group, Month, normalize_tags, parse_amount};

use crate::{
    client::{ApiClient, ClientError},
    config::AppConfig,
    error::Result,
    local_state::LocalState,
    session::Session,
    store::{GroupStore, Scope},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    SignUp,
    Landing,
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    UserId,
    Password,
}

#[derive(Debug)]
pub struct LoginState {
    pub user_id: String,
    pub password: String,
    pub focus: LoginField,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignUpField {
    Name,
    UserId,
    Password,
    Confirm,
}

#[derive(Debug, Default)]
pub struct SignUpState {
    pub name: String,
    pub user_id: String,
    pub password: String,
    pub confirm: String,
    pub focus: SignUpField,
    pub message: Option<String>,
}

impl Default for SignUpField {
    fn default() -> Self {
        Self::Name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LandingMode {
    #[default]
    Menu,
    Create,
    Join,
    Pick,
}

#[derive(Debug, Default)]
pub struct LandingState {
    pub mode: LandingMode,
    pub menu_selected: usize,
    pub group_name: String,
    pub created_code: Option<String>,
    pub join_code: String,
    pub groups: Vec<Group>,
    pub pick_selected: usize,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Expenses,
    Members,
}

impl Tab {
    pub fn label(self) -> &'static str {
        match self {
            Self::Expenses => "Expenses",
            Self::Members => "Members",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardMode {
    List,
    AddExpense,
    ConfirmDelete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddField {
    Amount,
    Date,
    Tags,
    Groups,
}

#[derive(Debug)]
pub struct AddExpenseState {
    pub amount: String,
    pub date: String,
    pub tags: String,
    /// Extra group codes to attribute the expense to, besides the current
    /// group.
    pub extra_groups: String,
    pub focus: AddField,
    pub message: Option<String>,
}

impl AddExpenseState {
    fn fresh() -> Self {
        Self {
            amount: String::new(),
            date: Local::now().date_naive().format("%Y-%m-%d").to_string(),
            tags: String::new(),
            extra_groups: String::new(),
            focus: AddField::Amount,
            message: None,
        }
    }
}

#[derive(Debug)]
pub struct DashboardState {
    pub tab: Tab,
    pub mode: DashboardMode,
    pub selected: usize,
    pub add: AddExpenseState,
    pub pending_delete: Option<Expense>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    pub shown_at: Instant,
}

const TOAST_LIFETIME: Duration = Duration::from_secs(4);

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub login: LoginState,
    pub signup: SignUpState,
    pub landing: LandingState,
    pub dashboard: DashboardState,
    pub store: GroupStore,
    pub session: Session,
    pub toast: Option<ToastState>,
}

pub struct App {
    config: AppConfig,
    client: ApiClient,
    local: LocalState,
    pub state: AppState,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = ApiClient::new(&config.base_url)?;
        let local = LocalState::load(&config.state_path)?;
        let session = Session::from_token(local.token.clone());

        let state = AppState {
            screen: if session.is_logged_in() {
                Screen::Landing
            } else {
                Screen::Login
            },
            login: LoginState {
                user_id: config.user_id.clone(),
                password: String::new(),
                focus: LoginField::UserId,
                message: None,
            },
            signup: SignUpState::default(),
            landing: LandingState::default(),
            dashboard: DashboardState {
                tab: Tab::Expenses,
                mode: DashboardMode::List,
                selected: 0,
                add: AddExpenseState::fresh(),
                pending_delete: None,
            },
            store: GroupStore::default(),
            session,
            toast: None,
        };

        Ok(Self {
            config,
            client,
            local,
            state,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        if self.state.session.is_logged_in() {
            self.register_device_if_needed().await;
            self.bootstrap_groups().await;
            self.state.screen = if self.state.store.current().is_some() {
                Screen::Dashboard
            } else {
                Screen::Landing
            };
        }

        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            if let Some(toast) = &self.state.toast
                && toast.shown_at.elapsed() > TOAST_LIFETIME
            {
                self.state.toast = None;
            }

            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| crate::error::AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key).await?,
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        let action = map_key(key);
        if action == AppAction::Quit {
            self.should_quit = true;
            return Ok(());
        }

        match self.state.screen {
            Screen::Login => self.handle_login_key(action).await,
            Screen::SignUp => self.handle_signup_key(action).await,
            Screen::Landing => self.handle_landing_key(action).await,
            Screen::Dashboard => self.handle_dashboard_key(action).await,
        }
    }

    // --- login -----------------------------------------------------------

    async fn handle_login_key(&mut self, action: AppAction) -> Result<()> {
        match action {
            AppAction::ToggleRegister => {
                self.state.screen = Screen::SignUp;
            }
            AppAction::NextField | AppAction::Down | AppAction::Up => {
                self.state.login.focus = match self.state.login.focus {
                    LoginField::UserId => LoginField::Password,
                    LoginField::Password => LoginField::UserId,
                };
            }
            AppAction::Submit => self.attempt_login().await,
            AppAction::Backspace => {
                self.active_login_field().pop();
            }
            AppAction::Input(ch) => {
                self.active_login_field().push(ch);
            }
            _ => {}
        }
        Ok(())
    }

    fn active_login_field(&mut self) -> &mut String {
        match self.state.login.focus {
            LoginField::UserId => &mut self.state.login.user_id,
            LoginField::Password => &mut self.state.login.password,
        }
    }

    async fn attempt_login(&mut self) {
        let user_id = self.state.login.user_id.trim().to_string();
        let password = self.state.login.password.trim().to_string();

        if user_id.is_empty() || password.is_empty() {
            self.state.login.message = Some("Please fill in all fields".to_string());
            return;
        }

        match self.client.login(&user_id, &password).await {
            Ok(response) => {
                self.state.session.set_token(response.token.clone());
                self.local.token = Some(response.token);
                self.persist_local();
                self.state.login.password.clear();
                self.state.login.message = None;

                self.register_device_if_needed().await;
                self.bootstrap_groups().await;
                self.state.screen = if self.state.store.current().is_some() {
                    Screen::Dashboard
                } else {
                    Screen::Landing
                };
            }
            Err(err) => {
                tracing::warn!("login failed: {err}");
                self.state.login.message = Some(match err {
                    ClientError::Unauthorized => "Invalid credentials".to_string(),
                    ClientError::Conflict(message) | ClientError::Validation(message) => message,
                    _ => "Something went wrong. Please try again.".to_string(),
                });
            }
        }
    }

    // --- sign-up ---------------------------------------------------------

    async fn handle_signup_key(&mut self, action: AppAction) -> Result<()> {
        match action {
            AppAction::ToggleRegister | AppAction::Cancel => {
                self.state.screen = Screen::Login;
            }
            AppAction::NextField | AppAction::Down => {
                self.state.signup.focus = match self.state.signup.focus {
                    SignUpField::Name => SignUpField::UserId,
                    SignUpField::UserId => SignUpField::Password,
                    SignUpField::Password => SignUpField::Confirm,
                    SignUpField::Confirm => SignUpField::Name,
                };
            }
            AppAction::Up => {
                self.state.signup.focus = match self.state.signup.focus {
                    SignUpField::Name => SignUpField::Confirm,
                    SignUpField::UserId => SignUpField::Name,
                    SignUpField::Password => SignUpField::UserId,
                    SignUpField::Confirm => SignUpField::Password,
                };
            }
            AppAction::Submit => self.attempt_signup().await,
            AppAction::Backspace => {
                self.active_signup_field().pop();
            }
            AppAction::Input(ch) => {
                self.active_signup_field().push(ch);
            }
            _ => {}
        }
        Ok(())
    }

    fn active_signup_field(&mut self) -> &mut String {
        match self.state.signup.focus {
            SignUpField::Name => &mut self.state.signup.name,
            SignUpField::UserId => &mut self.state.signup.user_id,
            SignUpField::Password => &mut self.state.signup.password,
            SignUpField::Confirm => &mut self.state.signup.confirm,
        }
    }

    async fn attempt_signup(&mut self) {
        let signup = &self.state.signup;
        let name = signup.name.trim().to_string();
        let user_id = signup.user_id.trim().to_string();
        let password = signup.password.clone();
        let confirm = signup.confirm.clone();

        // Validation happens before any network call.
        let validation = if name.is_empty() || user_id.is_empty() || password.is_empty() {
            Some("Please fill in all fields")
        } else if password != confirm {
            Some("Passwords do not match")
        } else if password.len() < 6 {
            Some("Password must be at least 6 characters")
        } else {
            None
        };
        if let Some(message) = validation {
            self.state.signup.message = Some(message.to_string());
            return;
        }

        match self.client.register(&name, &user_id, &password).await {
            Ok(()) => {
                self.state.signup = SignUpState::default();
                self.state.login.user_id = user_id;
                self.state.login.message = Some("Account created. Please sign in.".to_string());
                self.state.screen = Screen::Login;
            }
            Err(err) => {
                tracing::warn!("sign-up failed: {err}");
                self.state.signup.message = Some(match err {
                    ClientError::Conflict(_) => "userId already exists".to_string(),
                    ClientError::Validation(message) => message,
                    _ => "Something went wrong. Please try again.".to_string(),
                });
            }
        }
    }

    // --- landing ---------------------------------------------------------

    async fn handle_landing_key(&mut self, action: AppAction) -> Result<()> {
        match self.state.landing.mode {
            LandingMode::Menu => self.handle_landing_menu_key(action).await,
            LandingMode::Create => self.handle_landing_create_key(action).await,
            LandingMode::Join => self.handle_landing_join_key(action).await,
            LandingMode::Pick => self.handle_landing_pick_key(action).await,
        }
        Ok(())
    }

    async fn handle_landing_menu_key(&mut self, action: AppAction) {
        match action {
            AppAction::Up => {
                self.state.landing.menu_selected =
                    self.state.landing.menu_selected.saturating_sub(1);
            }
            AppAction::Down => {
                self.state.landing.menu_selected = (self.state.landing.menu_selected + 1).min(3);
            }
            AppAction::Submit => match self.state.landing.menu_selected {
                0 => self.open_create_form(),
                1 => self.open_join_form(),
                2 => self.enter_group().await,
                _ => self.logout(),
            },
            AppAction::Input('c') => self.open_create_form(),
            AppAction::Input('j') => self.open_join_form(),
            AppAction::Input('e') => self.enter_group().await,
            AppAction::Input('l') => self.logout(),
            AppAction::Input('q') => self.should_quit = true,
            AppAction::Cancel => {
                if self.state.store.current().is_some() {
                    self.state.screen = Screen::Dashboard;
                }
            }
            _ => {}
        }
    }

    fn open_create_form(&mut self) {
        let landing = &mut self.state.landing;
        landing.mode = LandingMode::Create;
        landing.group_name.clear();
        landing.created_code = None;
        landing.message = None;
    }

    fn open_join_form(&mut self) {
        let landing = &mut self.state.landing;
        landing.mode = LandingMode::Join;
        landing.join_code.clear();
        landing.message = None;
    }

    async fn handle_landing_create_key(&mut self, action: AppAction) {
        if self.state.landing.created_code.is_some() {
            // The code display stays up until dismissed.
            if matches!(action, AppAction::Submit | AppAction::Cancel) {
                self.state.landing.created_code = None;
                self.state.landing.mode = LandingMode::Menu;
            }
            return;
        }

        match action {
            AppAction::Cancel => {
                self.state.landing.mode = LandingMode::Menu;
                self.state.landing.message = None;
            }
            AppAction::Submit => self.attempt_create_group().await,
            AppAction::Backspace => {
                self.state.landing.group_name.pop();
            }
            AppAction::Input(ch) => self.state.landing.group_name.push(ch),
            _ => {}
        }
    }

    async fn attempt_create_group(&mut self) {
        let name = self.state.landing.group_name.trim().to_string();
        if name.is_empty() {
            self.state.landing.message = Some("Enter a group name.".to_string());
            return;
        }
        let Some(token) = self.state.session.token().map(str::to_string) else {
            return;
        };

        match self.client.create_group(&token, &name).await {
            Ok(group) => {
                let key = group.key.clone();
                self.state.landing.created_code = Some(key.clone());
                self.state.landing.message = None;
                self.resync_after_group_change(Some(&key)).await;
            }
            Err(err) => {
                tracing::warn!("create group failed: {err}");
                self.state.landing.message = Some(conflict_or_generic(err));
            }
        }
    }

    async fn handle_landing_join_key(&mut self, action: AppAction) {
        match action {
            AppAction::Cancel => {
                self.state.landing.mode = LandingMode::Menu;
                self.state.landing.message = None;
            }
            AppAction::Submit => self.attempt_join_group().await,
            AppAction::Backspace => {
                self.state.landing.join_code.pop();
            }
            AppAction::Input(ch) => self.state.landing.join_code.push(ch),
            _ => {}
        }
    }

    async fn attempt_join_group(&mut self) {
        let code = self.state.landing.join_code.trim().to_string();
        if code.is_empty() {
            self.state.landing.message = Some("Enter a group code.".to_string());
            return;
        }
        let Some(token) = self.state.session.token().map(str::to_string) else {
            return;
        };
        let user_id = self
            .state
            .session
            .user_id()
            .unwrap_or_default()
            .to_string();

        match self.client.join_group(&token, &code, &user_id).await {
            Ok(group) => {
                let key = group.key.clone();
                let name = if group.name.is_empty() { code } else { group.name };
                self.state.landing.join_code.clear();
                self.state.landing.mode = LandingMode::Menu;
                self.toast(ToastLevel::Success, format!("Joined group: {name}"));
                self.resync_after_group_change(Some(&key)).await;
            }
            Err(err) => {
                tracing::warn!("join group failed: {err}");
                self.state.landing.message = Some(conflict_or_generic(err));
            }
        }
    }

    async fn enter_group(&mut self) {
        if self.state.store.current().is_some() {
            self.state.screen = Screen::Dashboard;
            return;
        }
        let Some(token) = self.state.session.token().map(str::to_string) else {
            return;
        };

        // The legacy singular endpoint answers directly when the user has
        // one group; otherwise fall back to the full list.
        if let Ok(group) = self.client.my_group(&token).await {
            self.select_group(group);
            return;
        }

        match self.client.my_groups(&token).await {
            Ok(groups) if groups.is_empty() => {
                self.state.landing.message =
                    Some("You are not part of any group yet.".to_string());
            }
            Ok(mut groups) if groups.len() == 1 => {
                let group = groups.remove(0);
                self.select_group(group);
            }
            Ok(groups) => {
                self.state.landing.groups = groups;
                self.state.landing.pick_selected = 0;
                self.state.landing.mode = LandingMode::Pick;
            }
            Err(err) => {
                tracing::warn!("fetching groups failed: {err}");
                self.state.landing.message =
                    Some("Failed to fetch your group. Please try again.".to_string());
            }
        }
    }

    async fn handle_landing_pick_key(&mut self, action: AppAction) {
        match action {
            AppAction::Cancel => {
                self.state.landing.mode = LandingMode::Menu;
            }
            AppAction::Up => {
                self.state.landing.pick_selected =
                    self.state.landing.pick_selected.saturating_sub(1);
            }
            AppAction::Down => {
                let count = self.state.landing.groups.len();
                if count > 0 {
                    self.state.landing.pick_selected =
                        (self.state.landing.pick_selected + 1).min(count - 1);
                }
            }
            AppAction::Submit => {
                let selected = self
                    .state
                    .landing
                    .groups
                    .get(self.state.landing.pick_selected)
                    .cloned();
                if let Some(group) = selected {
                    self.select_group(group);
                }
            }
            _ => {}
        }
    }

    fn select_group(&mut self, group: Group) {
        let user_id = self.state.session.user_id().map(str::to_string);
        let key = self.state.store.select(group, user_id.as_deref());
        self.local.current_group_key = Some(key);
        self.persist_local();
        self.state.landing.mode = LandingMode::Menu;
        self.state.dashboard.selected = 0;
        self.state.screen = Screen::Dashboard;
    }

    // --- dashboard -------------------------------------------------------

    async fn handle_dashboard_key(&mut self, action: AppAction) -> Result<()> {
        match self.state.dashboard.mode {
            DashboardMode::List => self.handle_dashboard_list_key(action).await,
            DashboardMode::AddExpense => self.handle_add_expense_key(action).await,
            DashboardMode::ConfirmDelete => self.handle_confirm_delete_key(action).await,
        }
        Ok(())
    }

    async fn handle_dashboard_list_key(&mut self, action: AppAction) {
        match action {
            AppAction::Input('q') => self.should_quit = true,
            AppAction::Input('g') => {
                self.state.landing.mode = LandingMode::Menu;
                self.state.landing.message = None;
                self.state.screen = Screen::Landing;
            }
            AppAction::Input('e') => self.state.dashboard.tab = Tab::Expenses,
            AppAction::Input('m') => self.state.dashboard.tab = Tab::Members,
            AppAction::NextField => {
                self.state.dashboard.tab = match self.state.dashboard.tab {
                    Tab::Expenses => Tab::Members,
                    Tab::Members => Tab::Expenses,
                };
            }
            AppAction::Up | AppAction::Input('k') => {
                self.state.dashboard.selected = self.state.dashboard.selected.saturating_sub(1);
            }
            AppAction::Down | AppAction::Input('j') => {
                let count = self.state.store.visible_expenses().len();
                if count > 0 {
                    self.state.dashboard.selected =
                        (self.state.dashboard.selected + 1).min(count - 1);
                }
            }
            AppAction::Input('a') => {
                self.state.dashboard.add = AddExpenseState::fresh();
                self.state.dashboard.mode = DashboardMode::AddExpense;
            }
            AppAction::Input('d') => {
                if self.state.dashboard.tab == Tab::Expenses {
                    let expenses = self.state.store.visible_expenses();
                    if let Some(expense) = expenses.get(self.state.dashboard.selected) {
                        self.state.dashboard.pending_delete = Some(expense.clone());
                        self.state.dashboard.mode = DashboardMode::ConfirmDelete;
                    }
                }
            }
            AppAction::Input('r') => {
                self.refresh_store().await;
                self.toast(ToastLevel::Info, "Refreshed".to_string());
            }
            AppAction::Input('[') => self.step_month(-1),
            AppAction::Input(']') => self.step_month(1),
            AppAction::Input('t') => self.set_scope(Scope::Month(current_month())),
            AppAction::Input('o') => self.set_scope(Scope::AllTime),
            _ => {}
        }
    }

    fn set_scope(&mut self, scope: Scope) {
        let user_id = self.state.session.user_id().map(str::to_string);
        self.state.store.set_scope(scope, user_id.as_deref());
        self.state.dashboard.selected = 0;
    }

    fn step_month(&mut self, direction: i8) {
        let month = match self.state.store.scope() {
            Scope::Month(month) => month,
            Scope::AllTime => current_month(),
        };
        let stepped = if direction < 0 { month.prev() } else { month.next() };
        self.set_scope(Scope::Month(stepped));
    }

    async fn refresh_store(&mut self) {
        let Some(token) = self.state.session.token().map(str::to_string) else {
            return;
        };
        let user_id = self.state.session.user_id().map(str::to_string);
        self.state
            .store
            .refresh(&self.client, &token, user_id.as_deref())
            .await;
        let count = self.state.store.visible_expenses().len();
        self.state.dashboard.selected = self
            .state
            .dashboard
            .selected
            .min(count.saturating_sub(1));
    }

    async fn handle_add_expense_key(&mut self, action: AppAction) {
        match action {
            AppAction::Cancel => {
                self.state.dashboard.mode = DashboardMode::List;
            }
            AppAction::NextField | AppAction::Down => {
                let add = &mut self.state.dashboard.add;
                add.focus = match add.focus {
                    AddField::Amount => AddField::Date,
                    AddField::Date => AddField::Tags,
                    AddField::Tags => AddField::Groups,
                    AddField::Groups => AddField::Amount,
                };
            }
            AppAction::Up => {
                let add = &mut self.state.dashboard.add;
                add.focus = match add.focus {
                    AddField::Amount => AddField::Groups,
                    AddField::Date => AddField::Amount,
                    AddField::Tags => AddField::Date,
                    AddField::Groups => AddField::Tags,
                };
            }
            AppAction::Submit => self.submit_expense().await,
            AppAction::Backspace => {
                self.active_add_field().pop();
            }
            AppAction::Input(ch) => {
                self.active_add_field().push(ch);
            }
            _ => {}
        }
    }

    fn active_add_field(&mut self) -> &mut String {
        let add = &mut self.state.dashboard.add;
        match add.focus {
            AddField::Amount => &mut add.amount,
            AddField::Date => &mut add.date,
            AddField::Tags => &mut add.tags,
            AddField::Groups => &mut add.extra_groups,
        }
    }

    async fn submit_expense(&mut self) {
        // All validation happens before the network call.
        let amount = match parse_amount(&self.state.dashboard.add.amount) {
            Ok(amount) => amount,
            Err(err) => {
                self.state.dashboard.add.message = Some(err.to_string());
                return;
            }
        };
        let date = match NaiveDate::parse_from_str(self.state.dashboard.add.date.trim(), "%Y-%m-%d")
        {
            Ok(date) => date,
            Err(_) => {
                self.state.dashboard.add.message = Some("Date must be YYYY-MM-DD.".to_string());
                return;
            }
        };
        let tags = normalize_tags(self.state.dashboard.add.tags.split([',', ' ']));
        if tags.is_empty() {
            self.state.dashboard.add.message = Some("Add at least one tag.".to_string());
            return;
        }
        let extra_groups: Vec<String> = self
            .state
            .dashboard
            .add
            .extra_groups
            .split([',', ' '])
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .collect();

        let Some(current_key) = self.state.store.current().map(|group| group.key.clone()) else {
            self.state.dashboard.add.message = Some("No group selected.".to_string());
            return;
        };
        let Some(token) = self.state.session.token().map(str::to_string) else {
            return;
        };

        let group_codes = if extra_groups.is_empty() {
            None
        } else {
            let mut codes = vec![current_key];
            codes.extend(extra_groups);
            Some(codes)
        };
        let multi_group = group_codes.is_some();
        let payload = ExpenseNew {
            amount,
            payment_date: date.format("%Y-%m-%d").to_string(),
            tags,
            group_codes,
        };

        let result = if multi_group {
            self.client.add_expense_to_groups(&token, &payload).await
        } else {
            self.client.add_expense(&token, &payload).await
        };

        match result {
            Ok(()) => {
                // The server's state wins: nothing is shown until the
                // snapshot has been re-fetched.
                self.refresh_store().await;
                self.state.dashboard.mode = DashboardMode::List;
                self.state.dashboard.add = AddExpenseState::fresh();
                self.toast(ToastLevel::Success, "Expense added".to_string());
            }
            Err(err) => {
                tracing::warn!("failed to add expense: {err}");
                self.state.dashboard.add.message =
                    Some("Error adding expense. Please try again.".to_string());
            }
        }
    }

    async fn handle_confirm_delete_key(&mut self, action: AppAction) {
        match action {
            AppAction::Cancel | AppAction::Input('n') => {
                self.state.dashboard.pending_delete = None;
                self.state.dashboard.mode = DashboardMode::List;
            }
            AppAction::Submit | AppAction::Input('y') => self.confirm_delete().await,
            _ => {}
        }
    }

    async fn confirm_delete(&mut self) {
        let Some(expense) = self.state.dashboard.pending_delete.take() else {
            self.state.dashboard.mode = DashboardMode::List;
            return;
        };
        self.state.dashboard.mode = DashboardMode::List;
        let Some(token) = self.state.session.token().map(str::to_string) else {
            return;
        };

        match self.client.delete_expense(&token, &expense.id).await {
            Ok(()) => {
                self.refresh_store().await;
                self.toast(ToastLevel::Success, "Expense deleted".to_string());
            }
            Err(err) => {
                tracing::warn!("failed to delete expense: {err}");
                // The server's message field travels to the user untouched.
                let message = match err {
                    ClientError::Conflict(message)
                    | ClientError::Validation(message)
                    | ClientError::Server(message) => message,
                    _ => "Something went wrong".to_string(),
                };
                self.toast(ToastLevel::Error, message);
            }
        }
    }

    // --- shared ----------------------------------------------------------

    /// Resync after a group-level mutation. With a group selected this is
    /// the ordinary refresh (last-known snapshot kept on failure); from the
    /// empty state it is an initial load preferring the new group.
    async fn resync_after_group_change(&mut self, new_key: Option<&str>) {
        let Some(token) = self.state.session.token().map(str::to_string) else {
            return;
        };
        let user_id = self.state.session.user_id().map(str::to_string);

        if self.state.store.current().is_some() {
            self.state
                .store
                .refresh(&self.client, &token, user_id.as_deref())
                .await;
        } else {
            let selected = self
                .state
                .store
                .load_initial(&self.client, &token, new_key, user_id.as_deref())
                .await;
            if let Some(key) = selected {
                self.local.current_group_key = Some(key);
                self.persist_local();
            }
        }
    }

    async fn bootstrap_groups(&mut self) {
        let Some(token) = self.state.session.token().map(str::to_string) else {
            return;
        };
        let user_id = self.state.session.user_id().map(str::to_string);
        let preferred = self.local.current_group_key.clone();

        let selected = self
            .state
            .store
            .load_initial(&self.client, &token, preferred.as_deref(), user_id.as_deref())
            .await;
        if let Some(key) = selected
            && self.local.current_group_key.as_deref() != Some(key.as_str())
        {
            self.local.current_group_key = Some(key);
            self.persist_local();
        }

        self.set_scope(Scope::Month(current_month()));
    }

    /// Best-effort push registration; nothing here may block or fail the
    /// login flow.
    async fn register_device_if_needed(&mut self) {
        let Some(push_token) = self.config.push_token.clone() else {
            return;
        };
        if self.local.device_registered {
            return;
        }
        let (Some(token), Some(user_id)) = (
            self.state.session.token().map(str::to_string),
            self.state.session.user_id().map(str::to_string),
        ) else {
            return;
        };

        if !self.local.push_prompt_shown {
            self.local.push_prompt_shown = true;
            self.persist_local();
        }

        let group_codes = match self.client.my_groups(&token).await {
            Ok(groups) => groups.into_iter().map(|group| group.key).collect(),
            Err(err) => {
                tracing::warn!("fetching groups for device registration failed: {err}");
                Vec::new()
            }
        };
        let registration = DeviceRegister {
            user_id,
            token: push_token,
            group_codes,
        };
        match self.client.register_device(&token, &registration).await {
            Ok(()) => {
                self.local.device_registered = true;
                self.persist_local();
            }
            Err(err) => {
                tracing::warn!("device registration failed: {err}");
            }
        }
    }

    fn logout(&mut self) {
        self.local.token = None;
        self.persist_local();
        self.state.session.clear();
        self.state.store.clear();
        self.state.landing = LandingState::default();
        self.state.login.password.clear();
        self.state.login.message = Some("Logged out.".to_string());
        self.state.screen = Screen::Login;
    }

    fn persist_local(&self) {
        if let Err(err) = self.local.save(&self.config.state_path) {
            tracing::warn!("failed to persist local state: {err}");
        }
    }

    fn toast(&mut self, level: ToastLevel, message: String) {
        self.state.toast = Some(ToastState {
            message,
            level,
            shown_at: Instant::now(),
        });
    }
}

fn current_month() -> Month {
    Month::containing(Local::now().date_naive())
}

/// 409 bodies reach the user verbatim; everything else gets a generic
/// retry message.
fn conflict_or_generic(err: ClientError) -> String {
    match err {
        ClientError::Conflict(message) | ClientError::Validation(message) => message,
        _ => "Something went wrong. Please try again.".to_string(),
    }
}
