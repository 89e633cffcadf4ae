use serde_json::{json, Value};

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn product_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/Product" }
            }
        }
    })
}

fn id_parameter() -> Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "format": "int64" }
    })
}

fn payload_body() -> Value {
    json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ProductPayload" }
            }
        }
    })
}

/// OpenAPI fragment for the products module, paths relative to `/api/products`
pub fn document() -> Value {
    let pagination_header = |description: &str| {
        json!({ "description": description, "schema": { "type": "integer" } })
    };

    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List products",
                    "tags": ["Products"],
                    "parameters": [
                        {
                            "name": "search",
                            "in": "query",
                            "description": "Case-insensitive substring matched against name and description",
                            "schema": { "type": "string" }
                        },
                        {
                            "name": "page",
                            "in": "query",
                            "schema": { "type": "integer", "default": 1, "minimum": 1 }
                        },
                        {
                            "name": "pageSize",
                            "in": "query",
                            "schema": { "type": "integer", "default": 10, "minimum": 1 }
                        }
                    ],
                    "responses": {
                        "200": {
                            "description": "One page of products ordered by id",
                            "headers": {
                                "X-Total-Count": pagination_header("Products matching the search"),
                                "X-Page": pagination_header("Effective page number"),
                                "X-Page-Size": pagination_header("Effective page size")
                            },
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/Product" }
                                    }
                                }
                            }
                        },
                        "400": error_response("Malformed query string")
                    }
                },
                "post": {
                    "summary": "Create a product",
                    "tags": ["Products"],
                    "requestBody": payload_body(),
                    "responses": {
                        "201": product_response("Created product; Location points at it"),
                        "400": error_response("Validation failed or body malformed")
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": "Get a product",
                    "tags": ["Products"],
                    "parameters": [id_parameter()],
                    "responses": {
                        "200": product_response("The product"),
                        "404": error_response("Product not found")
                    }
                },
                "put": {
                    "summary": "Replace a product's mutable fields",
                    "tags": ["Products"],
                    "parameters": [id_parameter()],
                    "requestBody": payload_body(),
                    "responses": {
                        "200": product_response("Updated product"),
                        "400": error_response("Id mismatch or validation failed"),
                        "404": error_response("Product not found")
                    }
                },
                "delete": {
                    "summary": "Delete a product",
                    "tags": ["Products"],
                    "parameters": [id_parameter()],
                    "responses": {
                        "200": {
                            "description": "Deleted",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": { "message": { "type": "string" } },
                                        "required": ["message"]
                                    }
                                }
                            }
                        },
                        "404": error_response("Product not found")
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Products health check",
                    "tags": ["Products"],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": {
                                            "message": { "type": "string" },
                                            "timestamp": { "type": "string", "format": "date-time" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Product": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer", "format": "int64" },
                        "name": { "type": "string", "maxLength": 100 },
                        "description": { "type": "string", "maxLength": 1000 },
                        "price": {
                            "type": "number",
                            "exclusiveMinimum": 0,
                            "exclusiveMaximum": 10_000_000_000_000_000_i64
                        },
                        "image": { "type": "string", "format": "uri" },
                        "createdAt": { "type": "string", "format": "date-time" },
                        "updatedAt": { "type": "string", "format": "date-time" }
                    },
                    "required": ["id", "name", "description", "price", "createdAt", "updatedAt"]
                },
                "ProductPayload": {
                    "type": "object",
                    "properties": {
                        "id": {
                            "type": "integer",
                            "format": "int64",
                            "description": "Required on update and must equal the path id"
                        },
                        "name": { "type": "string", "minLength": 1, "maxLength": 100 },
                        "description": { "type": "string", "minLength": 1, "maxLength": 1000 },
                        "price": {
                            "type": "number",
                            "exclusiveMinimum": 0,
                            "exclusiveMaximum": 10_000_000_000_000_000_i64
                        },
                        "image": { "type": "string", "format": "uri" }
                    },
                    "required": ["name", "description", "price"]
                }
            }
        }
    })
}
