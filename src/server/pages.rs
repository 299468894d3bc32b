//! HTML pages: landing page, upload/search forms, and the generated
//! API-documentation page.

use axum::response::Html;

/// Documentation for one endpoint, rendered into the /docs page.
struct EndpointDoc {
    method: &'static str,
    path: &'static str,
    description: &'static str,
    params: &'static [ParamDoc],
}

struct ParamDoc {
    name: &'static str,
    required: bool,
    description: &'static str,
}

const ENDPOINTS: &[EndpointDoc] = &[
    EndpointDoc {
        method: "GET",
        path: "/inventory",
        description: "List all inventory records as a JSON array",
        params: &[],
    },
    EndpointDoc {
        method: "GET",
        path: "/inventory/:id",
        description: "Fetch one record by ID",
        params: &[ParamDoc {
            name: "id",
            required: true,
            description: "Numeric record ID (path)",
        }],
    },
    EndpointDoc {
        method: "GET",
        path: "/inventory/:id/photo",
        description: "Fetch the record's photo file",
        params: &[ParamDoc {
            name: "id",
            required: true,
            description: "Numeric record ID (path)",
        }],
    },
    EndpointDoc {
        method: "POST",
        path: "/register",
        description: "Register a new record (multipart form)",
        params: &[
            ParamDoc {
                name: "inventory_name",
                required: true,
                description: "Record name",
            },
            ParamDoc {
                name: "description",
                required: false,
                description: "Free-text description",
            },
            ParamDoc {
                name: "photo",
                required: false,
                description: "Photo file upload",
            },
        ],
    },
    EndpointDoc {
        method: "GET/POST",
        path: "/search",
        description: "Look up a record by ID, optionally appending its photo URL to the description",
        params: &[
            ParamDoc {
                name: "id",
                required: true,
                description: "Numeric record ID",
            },
            ParamDoc {
                name: "include_photo",
                required: false,
                description: "\"on\" or \"true\" to append the photo reference",
            },
        ],
    },
    EndpointDoc {
        method: "PUT",
        path: "/inventory/:id",
        description: "Update name and/or description (JSON body)",
        params: &[
            ParamDoc {
                name: "name",
                required: false,
                description: "New name",
            },
            ParamDoc {
                name: "description",
                required: false,
                description: "New description",
            },
        ],
    },
    EndpointDoc {
        method: "DELETE",
        path: "/inventory/:id",
        description: "Delete a record and its photo file",
        params: &[ParamDoc {
            name: "id",
            required: true,
            description: "Numeric record ID (path)",
        }],
    },
];

pub async fn index() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head><title>Stocklist</title></head>
<body>
  <h1>Stocklist</h1>
  <p>A small photo-aware inventory service.</p>
  <ul>
    <li><a href="/register">Register an item</a></li>
    <li><a href="/search/form">Search items</a></li>
    <li><a href="/inventory">Browse records (JSON)</a></li>
    <li><a href="/docs">API documentation</a></li>
  </ul>
</body>
</html>
"#,
    )
}

pub async fn register_form() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head><title>Register inventory</title></head>
<body>
  <h1>Register inventory</h1>
  <form action="/register" method="post" enctype="multipart/form-data">
    <p><label>Name: <input type="text" name="inventory_name" required></label></p>
    <p><label>Description: <input type="text" name="description"></label></p>
    <p><label>Photo: <input type="file" name="photo" accept="image/*"></label></p>
    <p><button type="submit">Register</button></p>
  </form>
</body>
</html>
"#,
    )
}

pub async fn search_form() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head><title>Search inventory</title></head>
<body>
  <h1>Search inventory</h1>
  <form action="/search" method="post">
    <p><label>ID: <input type="number" name="id" required></label></p>
    <p><label>Include photo: <input type="checkbox" name="include_photo"></label></p>
    <p><button type="submit">Search</button></p>
  </form>
</body>
</html>
"#,
    )
}

/// Render the endpoint table into a documentation page.
pub async fn docs() -> Html<String> {
    let mut body = String::from(
        r#"<!DOCTYPE html>
<html>
<head><title>Stocklist API</title></head>
<body>
  <h1>Stocklist API</h1>
  <table border="1" cellpadding="6">
    <tr><th>Method</th><th>Path</th><th>Description</th><th>Parameters</th></tr>
"#,
    );

    for endpoint in ENDPOINTS {
        let params = if endpoint.params.is_empty() {
            "&mdash;".to_string()
        } else {
            endpoint
                .params
                .iter()
                .map(|p| {
                    format!(
                        "<code>{}</code>{} &ndash; {}",
                        p.name,
                        if p.required { " (required)" } else { "" },
                        p.description
                    )
                })
                .collect::<Vec<_>>()
                .join("<br>")
        };
        body.push_str(&format!(
            "    <tr><td>{}</td><td><code>{}</code></td><td>{}</td><td>{}</td></tr>\n",
            endpoint.method, endpoint.path, endpoint.description, params
        ));
    }

    body.push_str(
        r#"  </table>
  <p><a href="/">Back</a></p>
</body>
</html>
"#,
    );

    Html(body)
}
