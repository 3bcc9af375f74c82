use crate::common::convert;
use factuator_babel::Mappings;
use insta::assert_snapshot;

#[test]
fn test_batch_json_shape() {
    let page = convert("''x''", &Mappings::default());
    let json = serde_json::to_string_pretty(&page.batch()).expect("batch to serialize");
    assert_snapshot!(json, @r###"
    {
      "requests": [
        {
          "insertText": {
            "location": {
              "index": 1
            },
            "text": "x"
          }
        },
        {
          "updateParagraphStyle": {
            "range": {
              "startIndex": 1,
              "endIndex": 2
            },
            "paragraphStyle": {
              "namedStyleType": "NORMAL_TEXT"
            },
            "fields": "namedStyleType"
          }
        },
        {
          "updateTextStyle": {
            "range": {
              "startIndex": 1,
              "endIndex": 2
            },
            "textStyle": {
              "bold": false,
              "italic": true,
              "fontSize": {
                "magnitude": 11.0,
                "unit": "PT"
              }
            },
            "fields": "bold,italic,fontSize"
          }
        }
      ]
    }
    "###);
}
