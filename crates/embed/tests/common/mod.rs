use std::fs;
use std::path::Path;

/// Word-level stand-in for the CLIP BPE tokenizer, covering the built-in prompts.
pub const TINY_TOKENIZER_JSON: &str = r#"{
    "version": "1.0",
    "truncation": null,
    "padding": null,
    "added_tokens": [],
    "normalizer": null,
    "pre_tokenizer": { "type": "Whitespace" },
    "post_processor": null,
    "decoder": null,
    "model": {
        "type": "WordLevel",
        "vocab": {
            "<|endoftext|>": 0, "<|unk|>": 1, ",": 2, ".": 3,
            "a": 4, "photo": 5, "of": 6, "document": 7, "book": 8, "paper": 9,
            "text": 10, "receipt": 11, "sign": 12, "handwriting": 13, "landscape": 14,
            "mountain": 15, "sky": 16, "nature": 17, "sunset": 18, "park": 19,
            "beach": 20, "person": 21, "face": 22, "man": 23, "woman": 24,
            "selfie": 25, "crowd": 26, "portrait": 27, "food": 28, "dish": 29,
            "meal": 30, "restaurant": 31, "fruit": 32, "vegetable": 33, "meat": 34,
            "product": 35, "bottle": 36, "box": 37, "item": 38, "tool": 39,
            "gadget": 40, "toy": 41
        },
        "unk_token": "<|unk|>"
    }
}"#;

/// Lays out an asset directory holding only `tokenizer.json`.
pub fn write_tokenizer(asset_dir: &Path) {
    fs::create_dir_all(asset_dir).expect("create asset dir");
    fs::write(asset_dir.join("tokenizer.json"), TINY_TOKENIZER_JSON).expect("write tokenizer");
}
