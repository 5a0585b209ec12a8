use parking_lot::Mutex;

/// Route the gateway forces the user onto when the server rejects a token.
pub const LOGIN_ROUTE: &str = "/login";

/// Navigation seam. The gateway renders nothing; it only needs to know
/// whether the user is already on the login screen (to avoid a redirect
/// loop) and, on a rejected token, to send them there.
pub trait Navigator: Send + Sync {
    fn current_route(&self) -> String;
    fn go_to_login(&self);

    fn on_login_screen(&self) -> bool {
        self.current_route().starts_with(LOGIN_ROUTE)
    }
}

/// Navigator backed by a plain route cell. Front-ends that own a real
/// router implement `Navigator` themselves; this one is enough for the CLI
/// and for tests.
pub struct RouteCell {
    route: Mutex<String>,
}

impl RouteCell {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            route: Mutex::new(initial.into()),
        }
    }

    pub fn set_route(&self, route: impl Into<String>) {
        *self.route.lock() = route.into();
    }
}

impl Navigator for RouteCell {
    fn current_route(&self) -> String {
        self.route.lock().clone()
    }

    fn go_to_login(&self) {
        *self.route.lock() = LOGIN_ROUTE.to_string();
    }
}
