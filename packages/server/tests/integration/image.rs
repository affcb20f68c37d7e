use serde_json::json;

use diary_server::config::ImageServeMode;

use crate::common::{TestApp, routes, test_config};

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff];

mod upload_image {
    use super::*;

    #[tokio::test]
    async fn upload_uses_the_part_filename_by_default() {
        let app = TestApp::spawn().await;

        let res = app.upload_image("day1.png", PNG_BYTES.to_vec(), None).await;

        assert_eq!(res.status, 201, "{}", res.text);

        let list = app.get(routes::IMAGE).await;
        let images = list.body.as_array().unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0]["filename"], "day1.png");
        assert_eq!(images[0]["base64"], "iVBORw0KGgoA/w==");
    }

    #[tokio::test]
    async fn filename_field_overrides_the_part_filename() {
        let app = TestApp::spawn().await;

        let res = app
            .upload_image("upload.bin", PNG_BYTES.to_vec(), Some("diary.png"))
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(app.get(&routes::image("diary.png")).await.status, 200);
        assert_eq!(app.get(&routes::image("upload.bin")).await.status, 404);
    }

    #[tokio::test]
    async fn reupload_replaces_the_stored_bytes() {
        let app = TestApp::spawn().await;
        app.upload_image("same.png", b"old".to_vec(), None).await;

        let res = app.upload_image("same.png", b"new".to_vec(), None).await;

        assert_eq!(res.status, 200);
        let list = app.get(routes::IMAGE).await;
        assert_eq!(list.body.as_array().unwrap().len(), 1);

        let raw = app.get_raw(&routes::image("same.png")).await;
        assert_eq!(raw.bytes().await.unwrap().as_ref(), b"new");
    }

    #[tokio::test]
    async fn path_like_filenames_are_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .upload_image("x.png", PNG_BYTES.to_vec(), Some("../etc/passwd"))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(app.get(routes::IMAGE).await.body, json!([]));
    }

    #[tokio::test]
    async fn request_without_file_part_is_rejected() {
        let app = TestApp::spawn().await;
        let form = reqwest::multipart::Form::new().text("filename", "lonely.png");

        let res = app
            .client
            .post(format!("http://{}{}", app.addr, routes::IMAGE))
            .multipart(form)
            .send()
            .await
            .unwrap();

        assert_eq!(res.status().as_u16(), 400);
    }

    #[tokio::test]
    async fn empty_file_is_stored_as_empty_payload() {
        let app = TestApp::spawn().await;

        let res = app.upload_image("blank.png", Vec::new(), None).await;
        assert_eq!(res.status, 201, "{}", res.text);

        let raw = app.get_raw(&routes::image("blank.png")).await;
        assert_eq!(raw.status().as_u16(), 200);
        assert!(raw.bytes().await.unwrap().is_empty());
    }
}

mod upload_limit {
    use super::*;

    async fn small_limit_app() -> TestApp {
        let mut config = test_config();
        config.image.max_upload_bytes = 1024;
        TestApp::spawn_with(config).await
    }

    #[tokio::test]
    async fn file_at_the_limit_is_accepted() {
        let app = small_limit_app().await;

        let res = app.upload_image("edge.png", vec![7u8; 1024], None).await;

        assert_eq!(res.status, 201, "{}", res.text);
    }

    #[tokio::test]
    async fn file_just_over_the_limit_is_rejected() {
        let app = small_limit_app().await;

        let res = app.upload_image("big.png", vec![7u8; 3000], None).await;

        assert_eq!(res.status, 413, "{}", res.text);
        assert_eq!(res.body["code"], "PAYLOAD_TOO_LARGE");
        assert_eq!(app.get(routes::IMAGE).await.body, json!([]));
    }

    #[tokio::test]
    async fn request_beyond_the_body_limit_is_rejected_as_too_large() {
        let app = small_limit_app().await;

        let res = app.upload_image("huge.png", vec![7u8; 8000], None).await;

        assert_eq!(res.status, 413, "{}", res.text);
        assert_eq!(res.body["code"], "PAYLOAD_TOO_LARGE");
        assert_eq!(app.get(routes::IMAGE).await.body, json!([]));
    }
}

mod get_image {
    use super::*;

    #[tokio::test]
    async fn binary_mode_returns_the_original_bytes() {
        let app = TestApp::spawn().await;
        app.upload_image("day1.png", PNG_BYTES.to_vec(), None).await;

        let res = app.get_raw(&routes::image("day1.png")).await;

        assert_eq!(res.status().as_u16(), 200);
        assert_eq!(res.headers()["content-type"], "image/png");
        let disposition = res.headers()["content-disposition"].to_str().unwrap();
        assert!(disposition.contains("day1.png"));
        assert_eq!(res.bytes().await.unwrap().as_ref(), PNG_BYTES);
    }

    #[tokio::test]
    async fn unknown_extension_falls_back_to_octet_stream() {
        let app = TestApp::spawn().await;
        app.upload_image("notes.unknownext", b"data".to_vec(), None)
            .await;

        let res = app.get_raw(&routes::image("notes.unknownext")).await;

        assert_eq!(res.headers()["content-type"], "application/octet-stream");
    }

    #[tokio::test]
    async fn encoded_json_mode_returns_the_base64_record() {
        let mut config = test_config();
        config.image.serve_mode = ImageServeMode::EncodedJson;
        let app = TestApp::spawn_with(config).await;
        app.upload_image("day1.png", PNG_BYTES.to_vec(), None).await;

        let res = app.get(&routes::image("day1.png")).await;

        assert_eq!(res.status, 200);
        assert_eq!(
            res.body,
            json!({"filename": "day1.png", "base64": "iVBORw0KGgoA/w=="})
        );
    }

    #[tokio::test]
    async fn missing_image_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::image("nope.png")).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod delete_image {
    use super::*;

    #[tokio::test]
    async fn delete_removes_the_image_once() {
        let app = TestApp::spawn().await;
        app.upload_image("old.png", PNG_BYTES.to_vec(), None).await;

        let first = app.delete(&routes::image("old.png")).await;
        assert_eq!(first.status, 200);

        let second = app.delete(&routes::image("old.png")).await;
        assert_eq!(second.status, 404);
        assert_eq!(app.get(&routes::image("old.png")).await.status, 404);
    }
}
