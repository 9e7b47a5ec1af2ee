//! Client route table of the single-page application.

use crate::i18n::Locale;
use crate::resources::ResourceKind;
use regex::Regex;
use std::sync::OnceLock;

/// Fixed bilingual text of the route table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Text {
    pub ru: &'static str,
    pub en: &'static str,
}

impl Text {
    pub fn get(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::Ru => self.ru,
            Locale::En => self.en,
        }
    }
}

#[derive(Debug)]
pub struct RouteDef {
    /// Value of `data-route` on the root element
    pub name: &'static str,
    /// Path pattern; `:id` matches a numeric record id
    pub pattern: &'static str,
    pub title: Text,
    pub description: Text,
    /// Record shown by a detail route
    pub resource: Option<ResourceKind>,
}

impl RouteDef {
    pub fn og_type(&self) -> &'static str {
        match self.resource {
            Some(_) => "article",
            None => "website",
        }
    }
}

pub static ROUTES: &[RouteDef] = &[
    RouteDef {
        name: "home",
        pattern: "/",
        title: Text { ru: "Главная", en: "Home" },
        description: Text {
            ru: "Официальный сайт общественного форума",
            en: "Official website of the Public Affairs Summit",
        },
        resource: None,
    },
    RouteDef {
        name: "about",
        pattern: "/about",
        title: Text { ru: "О форуме", en: "About" },
        description: Text {
            ru: "История, цели и организаторы форума",
            en: "History, goals and organizers of the summit",
        },
        resource: None,
    },
    RouteDef {
        name: "events",
        pattern: "/events",
        title: Text { ru: "Мероприятия", en: "Events" },
        description: Text {
            ru: "Программа мероприятий форума",
            en: "Summit events programme",
        },
        resource: None,
    },
    RouteDef {
        name: "event",
        pattern: "/events/:id",
        title: Text { ru: "Мероприятие", en: "Event" },
        description: Text {
            ru: "Подробности мероприятия",
            en: "Event details",
        },
        resource: Some(ResourceKind::Events),
    },
    RouteDef {
        name: "news",
        pattern: "/news",
        title: Text { ru: "Новости", en: "News" },
        description: Text {
            ru: "Новости и анонсы форума",
            en: "Summit news and announcements",
        },
        resource: None,
    },
    RouteDef {
        name: "news-item",
        pattern: "/news/:id",
        title: Text { ru: "Новость", en: "News" },
        description: Text {
            ru: "Новость форума",
            en: "Summit news article",
        },
        resource: Some(ResourceKind::News),
    },
    RouteDef {
        name: "partners",
        pattern: "/partners",
        title: Text { ru: "Партнёры", en: "Partners" },
        description: Text {
            ru: "Партнёры и спонсоры форума",
            en: "Summit partners and sponsors",
        },
        resource: None,
    },
    RouteDef {
        name: "hotels",
        pattern: "/hotels",
        title: Text { ru: "Гостиницы", en: "Hotels" },
        description: Text {
            ru: "Размещение участников",
            en: "Accommodation for participants",
        },
        resource: None,
    },
    RouteDef {
        name: "committee",
        pattern: "/committee",
        title: Text { ru: "Оргкомитет", en: "Committee" },
        description: Text {
            ru: "Состав организационного комитета",
            en: "Members of the organizing committee",
        },
        resource: None,
    },
    RouteDef {
        name: "competitions",
        pattern: "/competitions",
        title: Text { ru: "Конкурсы", en: "Competitions" },
        description: Text {
            ru: "Конкурсы форума и условия участия",
            en: "Summit competitions and entry rules",
        },
        resource: None,
    },
    RouteDef {
        name: "competition",
        pattern: "/competitions/:id",
        title: Text { ru: "Конкурс", en: "Competition" },
        description: Text {
            ru: "Подробности конкурса",
            en: "Competition details",
        },
        resource: Some(ResourceKind::Competitions),
    },
    RouteDef {
        name: "awards",
        pattern: "/awards",
        title: Text { ru: "Награды", en: "Awards" },
        description: Text {
            ru: "Лауреаты и награды форума",
            en: "Summit awards and laureates",
        },
        resource: None,
    },
    RouteDef {
        name: "contacts",
        pattern: "/contacts",
        title: Text { ru: "Контакты", en: "Contacts" },
        description: Text {
            ru: "Контакты организаторов",
            en: "Contact the organizers",
        },
        resource: None,
    },
];

pub static NOT_FOUND: RouteDef = RouteDef {
    name: "not-found",
    pattern: "*",
    title: Text {
        ru: "Страница не найдена",
        en: "Page not found",
    },
    description: Text {
        ru: "Запрошенная страница не существует",
        en: "The requested page does not exist",
    },
    resource: None,
};

/// Links of the main navigation, in display order.
pub static NAV_LINKS: &[(&str, Text)] = &[
    ("/", Text { ru: "Главная", en: "Home" }),
    ("/about", Text { ru: "О форуме", en: "About" }),
    ("/events", Text { ru: "Мероприятия", en: "Events" }),
    ("/news", Text { ru: "Новости", en: "News" }),
    ("/partners", Text { ru: "Партнёры", en: "Partners" }),
    ("/hotels", Text { ru: "Гостиницы", en: "Hotels" }),
    ("/committee", Text { ru: "Оргкомитет", en: "Committee" }),
    ("/competitions", Text { ru: "Конкурсы", en: "Competitions" }),
    ("/awards", Text { ru: "Награды", en: "Awards" }),
    ("/contacts", Text { ru: "Контакты", en: "Contacts" }),
];

#[derive(Debug, Clone, Copy)]
pub struct RouteMatch {
    pub route: &'static RouteDef,
    /// Record id of a detail route
    pub id: Option<i64>,
}

impl RouteMatch {
    pub fn is_not_found(&self) -> bool {
        std::ptr::eq(self.route, &NOT_FOUND)
    }
}

// Compiled route patterns
static MATCHERS: OnceLock<Vec<(Regex, &'static RouteDef)>> = OnceLock::new();

fn matchers() -> &'static [(Regex, &'static RouteDef)] {
    MATCHERS.get_or_init(|| {
        ROUTES
            .iter()
            .map(|route| {
                let pattern = format!("^{}$", route.pattern.replace(":id", r"(\d{1,18})"));
                let regex = Regex::new(&pattern).expect("route patterns are valid regexes");
                (regex, route)
            })
            .collect()
    })
}

/// Match a path with the locale prefix already removed.
pub fn match_route(path: &str) -> RouteMatch {
    let bare = path.split(['?', '#']).next().unwrap_or_default();
    let bare = match bare.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };

    for (regex, route) in matchers() {
        if let Some(captures) = regex.captures(bare) {
            let id = captures.get(1).and_then(|m| m.as_str().parse().ok());
            return RouteMatch { route, id };
        }
    }

    RouteMatch {
        route: &NOT_FOUND,
        id: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_routes() {
        for path in [
            "/", "/about", "/events", "/news", "/partners", "/hotels", "/committee",
            "/competitions", "/awards", "/contacts",
        ] {
            let matched = match_route(path);
            assert!(!matched.is_not_found(), "{path}");
            assert_eq!(matched.route.pattern, path);
            assert_eq!(matched.id, None);
        }
    }

    #[test]
    fn test_detail_routes() {
        let matched = match_route("/news/42");
        assert_eq!(matched.route.name, "news-item");
        assert_eq!(matched.id, Some(42));
        assert_eq!(matched.route.resource, Some(ResourceKind::News));
        assert_eq!(matched.route.og_type(), "article");

        assert_eq!(match_route("/events/7").route.resource, Some(ResourceKind::Events));
        assert_eq!(match_route("/competitions/3").id, Some(3));
    }

    #[test]
    fn test_trailing_slash_and_query() {
        assert_eq!(match_route("/news/").route.name, "news");
        assert_eq!(match_route("/news?page=2").route.name, "news");
        assert_eq!(match_route("").route.name, "home");
    }

    #[test]
    fn test_not_found() {
        assert!(match_route("/news/abc").is_not_found());
        assert!(match_route("/news/1/comments").is_not_found());
        assert!(match_route("/fr/x").is_not_found());
        assert!(match_route("/admin").is_not_found());
        assert_eq!(match_route("/nope").route.name, "not-found");
    }

    #[test]
    fn test_nav_links_point_at_routes() {
        for (href, label) in NAV_LINKS {
            assert!(!match_route(href).is_not_found(), "{href}");
            assert!(!label.get(Locale::En).is_empty());
        }
    }
}
