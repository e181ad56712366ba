//! Client-side navigation routes.

use std::fmt;

/// A view the console can show.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Departments,
    Processes {
        department_id: Option<i64>,
    },
    SubProcesses,
    /// Anything that did not match; keeps the requested path for display.
    NotFound(String),
}

impl Route {
    /// Parse a path with an optional query string.
    ///
    /// Trailing slashes are ignored. On `/processes`, a `departmentId` that is
    /// not a positive integer is dropped rather than failing the route.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let (path, query) = match input.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (input, None),
        };

        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Route::Home,
            "/departments" => Route::Departments,
            "/processes" => Route::Processes {
                department_id: query.and_then(|q| query_param(q, "departmentId")).and_then(parse_id),
            },
            "/subprocesses" => Route::SubProcesses,
            _ => Route::NotFound(path.to_string()),
        }
    }

    /// Path (with query) for this route.
    pub fn to_path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Departments => "/departments".to_string(),
            Route::Processes { department_id: None } => "/processes".to_string(),
            Route::Processes {
                department_id: Some(id),
            } => format!("/processes?departmentId={id}"),
            Route::SubProcesses => "/subprocesses".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Navigation bar label.
    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Departments => "Departments",
            Route::Processes { .. } => "Processes",
            Route::SubProcesses => "Subprocesses",
            Route::NotFound(_) => "Not Found",
        }
    }

    /// Whether two routes show the same view, ignoring query parameters.
    pub fn same_view(&self, other: &Route) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}

fn query_param<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

fn parse_id(value: &str) -> Option<i64> {
    value.parse::<i64>().ok().filter(|id| *id > 0)
}
