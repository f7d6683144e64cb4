//! Deterministic prompt templates. Pure string assembly; the external LLM
//! provider consumes the output.

/// Format the final RAG prompt for `query` over `context`.
///
/// An empty context produces a template that instructs the model to tell
/// the user nothing relevant was found, rather than letting it answer from
/// its own priors.
pub fn format_rag_prompt(query: &str, context: &str) -> String {
    if context.trim().is_empty() {
        return format!(
            "You are a helpful assistant. The user has asked a question but no relevant \
             context was found in the documents.\n\
             \n\
             User Question: {query}\n\
             \n\
             Please let the user know that you don't have relevant information in the \
             provided documents to answer their question accurately."
        );
    }

    format!(
        "You are a helpful assistant that answers questions based on provided document \
         context. Use only the information from the context below to answer the user's \
         question. If the context doesn't contain enough information to answer the \
         question, say so clearly.\n\
         \n\
         Context from Documents:\n\
         {context}\n\
         \n\
         User Question: {query}\n\
         \n\
         Instructions:\n\
         - Answer based only on the provided context\n\
         - If the context doesn't have enough information, say so\n\
         - Be specific and cite relevant parts of the context\n\
         - Don't make up information not present in the context\n\
         \n\
         Answer:"
    )
}
